use doctrine_codegen::{
    Column, EntityWriter, Error, ForeignKey, GeneratorConfig, Index, IndexKind, MemoryStorage,
    Schema, Storage, Table, WriteStatus,
};
use pretty_assertions::assert_eq;

fn generate(schema: &Schema, config: &GeneratorConfig) -> MemoryStorage {
    let mut storage = MemoryStorage::new();
    EntityWriter::new(schema, config).generate(&mut storage);
    storage
}

fn places_schema() -> Schema {
    let places = Table::new("places", "").columns(vec![
        Column::new(1, "id", "INT").primary().auto_increment(),
        Column::new(2, "name", "VARCHAR(45)"),
    ]);
    let persons = Table::new("persons", "")
        .columns(vec![
            Column::new(3, "id", "INT").primary().auto_increment(),
            Column::new(4, "places_id", "INT"),
            Column::new(5, "name", "VARCHAR(45)"),
        ])
        .indexes(vec![Index::new(
            "fk_persons_places_idx",
            vec!["places_id"],
            IndexKind::Index,
        )])
        .foreign_keys(vec![ForeignKey::new(
            "fk_persons_places",
            "persons",
            "places",
            vec!["places_id"],
            vec!["id"],
        )
        .delete_rule("CASCADE")]);
    Schema::new(vec![places, persons]).unwrap()
}

fn skills_schema() -> Schema {
    let persons = Table::new("persons", "").columns(vec![
        Column::new(1, "id", "INT").primary().auto_increment(),
        Column::new(2, "name", "VARCHAR(45)"),
    ]);
    let skills = Table::new("skills", "").columns(vec![
        Column::new(10, "id", "INT").primary().auto_increment(),
        Column::new(11, "name", "VARCHAR(45)"),
    ]);
    let junction = Table::new("persons_has_skills", "")
        .columns(vec![
            Column::new(20, "persons_id", "INT").primary(),
            Column::new(21, "skills_id", "INT").primary(),
        ])
        .foreign_keys(vec![
            ForeignKey::new(
                "fk_phs_persons",
                "persons_has_skills",
                "persons",
                vec!["persons_id"],
                vec!["id"],
            ),
            ForeignKey::new(
                "fk_phs_skills",
                "persons_has_skills",
                "skills",
                vec!["skills_id"],
                vec!["id"],
            ),
        ]);
    Schema::new(vec![persons, skills, junction]).unwrap()
}

fn tools_schema(owner_comment: &str, spare_comment: &str) -> Schema {
    let persons = Table::new("persons", "").columns(vec![
        Column::new(1, "id", "INT").primary().auto_increment(),
        Column::new(2, "name", "VARCHAR(45)"),
    ]);
    let tools = Table::new("tools", "")
        .columns(vec![
            Column::new(10, "id", "INT").primary().auto_increment(),
            Column::new(11, "owner_id", "INT"),
            Column::new(12, "spare_id", "INT").nullable(),
        ])
        .foreign_keys(vec![
            ForeignKey::new("fk_tools_owner", "tools", "persons", vec!["owner_id"], vec!["id"])
                .comment(owner_comment),
            ForeignKey::new("fk_tools_spare", "tools", "persons", vec!["spare_id"], vec!["id"])
                .comment(spare_comment),
        ]);
    Schema::new(vec![persons, tools]).unwrap()
}

#[test]
fn plain_entities_match_expected_sources() {
    let schema = places_schema();
    let config = GeneratorConfig::default();
    let storage = generate(&schema, &config);

    assert_eq!(
        storage.file("Entity/Place.php").unwrap(),
        include_str!("expected/place.php")
    );
    assert_eq!(
        storage.file("Entity/Person.php").unwrap(),
        include_str!("expected/person.php")
    );
}

#[test]
fn junction_folds_into_many_to_many() {
    let schema = skills_schema();
    let config = GeneratorConfig::default();
    let mut storage = MemoryStorage::new();
    let report = EntityWriter::new(&schema, &config).generate(&mut storage);

    assert!(matches!(
        report.status_of("persons_has_skills"),
        Some(Ok(WriteStatus::SkippedJunction))
    ));
    assert_eq!(storage.paths().count(), 2);

    let person = storage.file("Entity/Person.php").unwrap();
    let skill = storage.file("Entity/Skill.php").unwrap();

    // The side with the lower junction column id owns the join table.
    assert!(person.contains("JoinTable("));
    assert!(person.contains("inversedBy=\"people\""));
    assert!(person.contains("protected $skills;"));
    assert!(person.contains("$skill->addPerson($this);"));
    assert!(!skill.contains("JoinTable("));
    assert!(skill.contains("mappedBy=\"skills\""));
    assert!(skill.contains("protected $people;"));
    assert!(!skill.contains("$person->addSkill($this);"));
}

#[test]
fn owning_side_is_stable_across_runs() {
    let first = generate(&skills_schema(), &GeneratorConfig::default());
    for _ in 0..5 {
        let again = generate(&skills_schema(), &GeneratorConfig::default());
        assert_eq!(
            first.file("Entity/Person.php").unwrap(),
            again.file("Entity/Person.php").unwrap()
        );
        assert_eq!(
            first.file("Entity/Skill.php").unwrap(),
            again.file("Entity/Skill.php").unwrap()
        );
    }
}

#[test]
fn junction_is_emitted_when_folding_is_off() {
    let schema = skills_schema();
    let config = GeneratorConfig {
        skip_m2m_tables: false,
        ..Default::default()
    };
    let mut storage = MemoryStorage::new();
    let report = EntityWriter::new(&schema, &config).generate(&mut storage);

    assert!(matches!(
        report.status_of("persons_has_skills"),
        Some(Ok(WriteStatus::Written))
    ));
    assert_eq!(storage.paths().count(), 3);
    let person = storage.file("Entity/Person.php").unwrap();
    assert!(!person.contains("ManyToMany"));
    // The junction's keys surface as plain one-to-many collections instead.
    assert!(person.contains("OneToMany"));
}

#[test]
fn sibling_relations_to_one_table_are_disambiguated() {
    let schema = tools_schema(
        "{d:related}AsOwner{/d:related}",
        "{d:related}AsSpare{/d:related}",
    );
    let config = GeneratorConfig::default();
    let storage = generate(&schema, &config);

    let person = storage.file("Entity/Person.php").unwrap();
    assert!(person.contains("protected $toolsAsOwner;"));
    assert!(person.contains("protected $toolsAsSpare;"));
    assert!(person.contains("public function addToolAsOwner(Tool $tool)"));
    assert!(person.contains("public function removeToolAsOwner(Tool $tool)"));
    assert!(person.contains("public function getToolsAsOwner()"));
    assert!(person.contains("public function addToolAsSpare(Tool $tool)"));
    assert!(person.contains("mappedBy=\"personAsOwner\""));
    assert!(person.contains("mappedBy=\"personAsSpare\""));

    let tool = storage.file("Entity/Tool.php").unwrap();
    assert!(tool.contains("protected $personAsOwner;"));
    assert!(tool.contains("protected $personAsSpare;"));
    assert!(tool.contains("public function setPersonAsOwner(Person $person = null)"));
    assert!(tool.contains("public function getPersonAsSpare()"));
    assert!(tool.contains("inversedBy=\"toolsAsOwner\""));
    assert!(tool.contains("inversedBy=\"toolsAsSpare\""));
}

#[test]
fn hintless_siblings_fall_back_to_column_names() {
    let schema = tools_schema("", "");
    let storage = generate(&schema, &GeneratorConfig::default());

    let tool = storage.file("Entity/Tool.php").unwrap();
    assert!(tool.contains("protected $personRelatedByOwnerId;"));
    assert!(tool.contains("protected $personRelatedBySpareId;"));
}

#[test]
fn generation_is_deterministic() {
    let schema = tools_schema("{d:related}AsOwner{/d:related}", "");
    let config = GeneratorConfig::default();
    let first = generate(&schema, &config);
    let second = generate(&schema, &config);

    let paths: Vec<&str> = first.paths().collect();
    assert_eq!(paths, second.paths().collect::<Vec<&str>>());
    for path in paths {
        assert_eq!(first.file(path), second.file(path));
    }
}

#[test]
fn extendable_entities_protect_hand_written_extensions() {
    let schema = places_schema();
    let config = GeneratorConfig {
        generate_extendable_entity: true,
        extendable_entity_single_inheritance: true,
        ..Default::default()
    };
    let mut storage = MemoryStorage::new();
    EntityWriter::new(&schema, &config).generate(&mut storage);

    let base = storage.file("Entity/BasePerson.php").unwrap().to_string();
    let concrete = storage.file("Entity/Person.php").unwrap().to_string();
    assert!(base.contains("abstract class BasePerson"));
    assert!(base.contains("@ORM\\InheritanceType(\"SINGLE_TABLE\")"));
    assert!(base.contains("@ORM\\DiscriminatorColumn(name=\"discr\", type=\"string\")"));
    assert!(base.contains("\"extended\":\"Entity\\Person\""));
    assert!(concrete.contains("class Person extends BasePerson"));

    // Simulate hand customization of both files, then regenerate.
    storage
        .put_file("Entity/Person.php", "<?php // customized\n".to_string())
        .unwrap();
    storage
        .put_file("Entity/BasePerson.php", "<?php // clobbered base\n".to_string())
        .unwrap();
    EntityWriter::new(&schema, &config).generate(&mut storage);

    assert_eq!(storage.file("Entity/BasePerson.php").unwrap(), base);
    assert_eq!(storage.file("Entity/Person.php").unwrap(), "<?php // customized\n");

    // With the overwrite flag set the concrete file is regenerated too.
    let overwrite_config = GeneratorConfig {
        overwrite_extended_entities: true,
        ..config
    };
    EntityWriter::new(&schema, &overwrite_config).generate(&mut storage);
    assert_eq!(storage.file("Entity/Person.php").unwrap(), concrete);
}

#[test]
fn discriminator_map_produces_companion_classes() {
    let persons = Table::new(
        "persons",
        "{d:discriminatorMap}surgeon=Surgeon{/d:discriminatorMap}",
    )
    .columns(vec![
        Column::new(1, "id", "INT").primary().auto_increment(),
        Column::new(2, "name", "VARCHAR(45)"),
    ]);
    let schema = Schema::new(vec![persons]).unwrap();
    let storage = generate(&schema, &GeneratorConfig::default());

    let person = storage.file("Entity/Person.php").unwrap();
    assert!(person.contains("@ORM\\InheritanceType(\"SINGLE_TABLE\")"));
    assert!(person.contains(
        "@ORM\\DiscriminatorMap({\"surgeon\":\"Entity\\Surgeon\", \"person\":\"Entity\\Person\"})"
    ));
    assert_eq!(
        storage.file("Entity/Surgeon.php").unwrap(),
        include_str!("expected/surgeon.php")
    );
}

#[test]
fn discriminator_failures_are_isolated_per_table() {
    let broken = Table::new("tools", "{d:discriminator}kind{/d:discriminator}").columns(vec![
        Column::new(1, "id", "INT").primary().auto_increment(),
    ]);
    let healthy = Table::new("places", "").columns(vec![
        Column::new(10, "id", "INT").primary().auto_increment(),
        Column::new(11, "name", "VARCHAR(45)"),
    ]);
    let schema = Schema::new(vec![broken, healthy]).unwrap();
    let mut storage = MemoryStorage::new();
    let report = EntityWriter::new(&schema, &GeneratorConfig::default()).generate(&mut storage);

    assert!(matches!(
        report.status_of("tools"),
        Some(Err(Error::DiscriminatorColumnNotFound { .. }))
    ));
    assert!(matches!(
        report.status_of("places"),
        Some(Ok(WriteStatus::Written))
    ));
    assert!(!storage.has_file("Entity/Tool.php"));
    assert!(storage.has_file("Entity/Place.php"));
}

#[test]
fn external_tables_are_skipped_entirely() {
    let legacy = Table::new("legacy_users", "{d:external}true{/d:external}")
        .columns(vec![Column::new(1, "id", "INT").primary()]);
    let schema = Schema::new(vec![legacy]).unwrap();
    let mut storage = MemoryStorage::new();
    let report = EntityWriter::new(&schema, &GeneratorConfig::default()).generate(&mut storage);

    assert!(matches!(
        report.status_of("legacy_users"),
        Some(Ok(WriteStatus::SkippedExternal))
    ));
    assert_eq!(storage.paths().count(), 0);
}

#[test]
fn unidirectional_relations_have_no_inverse_side() {
    let schema = tools_schema("{d:unidirectional}true{/d:unidirectional}", "");
    let storage = generate(&schema, &GeneratorConfig::default());

    let person = storage.file("Entity/Person.php").unwrap();
    let tool = storage.file("Entity/Tool.php").unwrap();

    // Only the bidirectional spare key produces a collection on Person.
    assert!(person.contains("protected $toolsRelatedBySpareId;"));
    assert!(!person.contains("protected $toolsRelatedByOwnerId;"));
    assert!(!person.contains("addToolRelatedByOwnerId"));

    // The owning side of the unidirectional key carries no inversedBy.
    assert!(tool.contains("inversedBy=\"toolsRelatedBySpareId\""));
    assert!(!tool.contains("inversedBy=\"toolsRelatedByOwnerId\""));
}

#[test]
fn relation_hints_flow_into_annotations() {
    let schema = tools_schema(
        "{d:cascade}persist, bogus, remove{/d:cascade} {d:fetch}lazy{/d:fetch}",
        "{d:fetch}BOGUS{/d:fetch}",
    );
    let storage = generate(&schema, &GeneratorConfig::default());
    let tool = storage.file("Entity/Tool.php").unwrap();

    assert!(tool.contains("cascade={\"persist\", \"remove\"}"));
    assert!(tool.contains("fetch=\"LAZY\""));
    // The invalid fetch hint degrades to an absent option, not an error.
    assert!(!tool.contains("BOGUS"));
}

#[test]
fn reserved_identifiers_are_quoted_under_auto_strategy() {
    let orders = Table::new("orders", "").columns(vec![
        Column::new(1, "id", "INT").primary().auto_increment(),
        Column::new(2, "order", "INT"),
    ]);
    let schema = Schema::new(vec![orders]).unwrap();
    let storage = generate(&schema, &GeneratorConfig::default());

    let order = storage.file("Entity/Order.php").unwrap();
    assert!(order.contains("@ORM\\Table(name=\"orders\")"));
    assert!(order.contains("@ORM\\Column(name=\"`order`\", type=\"integer\")"));
}

#[test]
fn lifecycle_callbacks_emit_marker_and_handlers() {
    let persons = Table::new(
        "persons",
        "{d:lifecycleCallbacks}prePersist:stampCreated{/d:lifecycleCallbacks}",
    )
    .columns(vec![Column::new(1, "id", "INT").primary().auto_increment()]);
    let schema = Schema::new(vec![persons]).unwrap();
    let storage = generate(&schema, &GeneratorConfig::default());

    let person = storage.file("Entity/Person.php").unwrap();
    assert!(person.contains(" * @HasLifecycleCallbacks"));
    assert!(person.contains(" * @PrePersist"));
    assert!(person.contains("public function stampCreated()"));
}
