//! Per-table emission pipeline: decides which files to (re)write for every
//! table, renders class bodies through the line writer and isolates fatal
//! configuration errors so one broken table never stops the run.

use std::collections::BTreeSet;

use heck::CamelCase;
use tracing::{debug, info, warn};

use crate::annotation::{callback_marker, Annotation, MapStyle, Value};
use crate::util::{lcfirst, ucfirst};
use crate::writer::{LineWriter, Storage};
use crate::Error;

use super::relation::{
    is_local_key_ignored, is_referencing_key_ignored, related_suffix, related_text,
};
use super::{
    datatype, inheritance, naming, options, Column, Discriminator, ForeignKey, GeneratorConfig,
    ManyToManyRelation, Schema, Table,
};

/// Outcome of processing one table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WriteStatus {
    /// Entity files were produced.
    Written,
    /// Table is marked external, nothing emitted.
    SkippedExternal,
    /// Pure junction folded into `ManyToMany` fields on its endpoints.
    SkippedJunction,
}

#[derive(Debug)]
pub struct TableOutcome {
    pub table: String,
    pub result: Result<WriteStatus, Error>,
}

/// What a generation run did: one outcome per table plus the exact set of
/// paths written, kept as an explicit map so the overwrite policy stays
/// testable without a real filesystem.
#[derive(Debug, Default)]
pub struct GenerationReport {
    pub outcomes: Vec<TableOutcome>,
    pub written_files: BTreeSet<String>,
}

impl GenerationReport {
    pub fn status_of(&self, table: &str) -> Option<&Result<WriteStatus, Error>> {
        self.outcomes
            .iter()
            .find(|outcome| outcome.table == table)
            .map(|outcome| &outcome.result)
    }
}

const ORM_MAPPING_USE: &str = "Doctrine\\ORM\\Mapping as ORM";
const COLLECTION_CLASS: &str = "Doctrine\\Common\\Collections\\ArrayCollection";
const COLLECTION_INTERFACE: &str = "\\Doctrine\\Common\\Collections\\Collection";

pub struct EntityWriter<'a> {
    schema: &'a Schema,
    config: &'a GeneratorConfig,
}

impl<'a> EntityWriter<'a> {
    pub fn new(schema: &'a Schema, config: &'a GeneratorConfig) -> Self {
        Self { schema, config }
    }

    /// Process every table to completion, in schema order. Fatal errors are
    /// recorded per table and do not abort the remainder of the run.
    pub fn generate(&self, storage: &mut dyn Storage) -> GenerationReport {
        let mut report = GenerationReport::default();
        for table in self.schema.tables() {
            let result = self.write_table(storage, &mut report.written_files, table);
            if let Err(err) = &result {
                warn!("generation of `{}` aborted: {}", table.name, err);
            }
            report.outcomes.push(TableOutcome {
                table: table.name.clone(),
                result,
            });
        }
        report
    }

    fn write_table(
        &self,
        storage: &mut dyn Storage,
        written: &mut BTreeSet<String>,
        table: &Table,
    ) -> Result<WriteStatus, Error> {
        if table.is_external() {
            info!("skipping external table `{}`", table.name);
            return Ok(WriteStatus::SkippedExternal);
        }
        if self.config.skip_m2m_tables && table.is_many_to_many() {
            info!("folding junction table `{}` into its endpoints", table.name);
            return Ok(WriteStatus::SkippedJunction);
        }
        self.write_entities(storage, written, table)?;
        Ok(WriteStatus::Written)
    }

    fn write_entities(
        &self,
        storage: &mut dyn Storage,
        written: &mut BTreeSet<String>,
        table: &Table,
    ) -> Result<(), Error> {
        let model = naming::model_name(table);
        info!("writing table `{}` as `{}`", table.name, model);

        let discriminator = inheritance::resolve(table, self.config)?;
        let extendable = self.config.generate_extendable_entity;

        self.write_main_entity(storage, written, table, &model, &discriminator)?;

        for (_, class) in &discriminator.map {
            if !extendable && *class == model {
                continue;
            }
            if extendable {
                if *class != model {
                    // Abstract shell between the hierarchy root and the
                    // hand-extendable concrete subclass.
                    self.write_shell(storage, written, class, &model, true, true)?;
                }
                let overwrite = self.config.overwrite_extended_entities;
                self.write_shell(storage, written, class, class, false, overwrite)?;
            } else {
                self.write_shell(storage, written, class, &model, false, true)?;
            }
        }
        Ok(())
    }

    /// The root entity file: a plain entity, or the abstract base holding
    /// every field and accessor when extendable generation is on. Always
    /// rewritten.
    fn write_main_entity(
        &self,
        storage: &mut dyn Storage,
        written: &mut BTreeSet<String>,
        table: &Table,
        model: &str,
        discriminator: &Discriminator,
    ) -> Result<(), Error> {
        let base = self.config.generate_extendable_entity;
        let class = self.class_name(base, model);
        let path = self.class_file_name(base, model);
        let namespace = self.config.entity_namespace(base);
        let callbacks = table.lifecycle_callbacks();
        let single_inheritance = discriminator.is_single_inheritance();

        let inverse_keys = self.inverse_keys(table);
        let local_keys = self.local_keys(table);
        let m2m_relations = self.m2m_relations(table);
        let has_collections = !m2m_relations.is_empty()
            || inverse_keys
                .iter()
                .any(|fk| self.declaring_table_of(fk).map_or(false, |t| fk.is_many_to_one(t)));

        let mut writer = LineWriter::open(storage, path.clone(), self.config.indentation);
        writer.write("<?php").write("");
        writer.write(format!("namespace {};", namespace)).write("");
        if self.config.annotation_prefix == "ORM\\" {
            writer.write(format!("use {};", ORM_MAPPING_USE));
        }
        if has_collections {
            writer.write(format!("use {};", COLLECTION_CLASS));
        }
        writer.write("");

        writer.write("/**");
        writer.write(format!(" * {}", self.fqcn(false, model)));
        writer.write(" *");
        let comment = table.display_comment();
        for line in comment.lines().filter(|l| !l.trim().is_empty()) {
            writer.write(format!(" * {}", line.trim()));
        }
        writer.write_if(!comment.is_empty(), " *");
        writer.write(format!(" * {}", self.entity_annotation(model).render()));
        writer.write(format!(" * {}", self.table_annotation(table).render()));
        if single_inheritance {
            writer.write(format!(
                " * {}",
                self.annotation("InheritanceType")
                    .arg(Value::string("SINGLE_TABLE"))
                    .render()
            ));
            writer.write(format!(
                " * {}",
                self.annotation("DiscriminatorColumn")
                    .opt("name", Some(Value::string(discriminator.column.name.as_str())))
                    .opt("type", Some(Value::string(discriminator.column.dtype.as_str())))
                    .render()
            ));
            let map = Value::Map(
                discriminator
                    .map
                    .iter()
                    .map(|(key, class)| (key.clone(), Value::string(self.fqcn(false, class))))
                    .collect(),
                MapStyle::Colon,
            );
            writer.write(format!(
                " * {}",
                self.annotation("DiscriminatorMap").arg(map).render()
            ));
        }
        writer.write_if(!callbacks.is_empty(), " * @HasLifecycleCallbacks");
        writer.write(" */");

        let abstract_prefix = if base { "abstract " } else { "" };
        writer.write(format!("{}class {}", abstract_prefix, class));
        writer.write("{");
        writer.indent();

        self.write_column_vars(&mut writer, table);
        self.write_relation_vars(&mut writer, table, model, &inverse_keys, &local_keys);
        self.write_m2m_vars(&mut writer, table, &m2m_relations);
        self.write_constructor(&mut writer, &inverse_keys, &m2m_relations);

        if !self.config.skip_getter_setter {
            self.write_column_accessors(&mut writer, table, base, model);
            self.write_relation_accessors(&mut writer, table, model, base, &inverse_keys, &local_keys);
            self.write_m2m_accessors(&mut writer, model, base, &m2m_relations);
        }

        for (event, handlers) in &callbacks {
            for handler in handlers {
                writer
                    .write("/**")
                    .write(format!(" * {}", callback_marker(event)))
                    .write(" */")
                    .write(format!("public function {}()", handler))
                    .write("{")
                    .write("}")
                    .write("");
            }
        }

        if self.config.generate_entity_serialization {
            self.write_serialization(&mut writer, table);
        }

        writer.outdent();
        writer.write("}");
        writer.close()?;
        written.insert(path);
        Ok(())
    }

    /// Companion shell for a discriminator-map class. Base shells are always
    /// rewritten; concrete shells honor the overwrite flag so hand-written
    /// extensions survive regeneration.
    fn write_shell(
        &self,
        storage: &mut dyn Storage,
        written: &mut BTreeSet<String>,
        class: &str,
        parent: &str,
        is_base: bool,
        overwrite: bool,
    ) -> Result<(), Error> {
        let path = self.class_file_name(is_base, class);
        if written.contains(&path) {
            debug!("`{}` already produced in this run", path);
            return Ok(());
        }
        if !overwrite && storage.has_file(&path) {
            info!("keeping existing `{}`", path);
            return Ok(());
        }
        info!("writing `{}`", path);

        let namespace = self.config.entity_namespace(is_base);
        // A concrete shell extends its own base when extendable generation
        // is on, otherwise the hierarchy root; a base shell always extends
        // the root's concrete class.
        let (parent_ns_is_base, parent_decl) = if is_base {
            (false, self.class_name(false, parent))
        } else if self.config.generate_extendable_entity {
            (true, self.class_name(true, parent))
        } else {
            (false, self.class_name(false, parent))
        };
        let parent_namespace = self.config.entity_namespace(parent_ns_is_base);
        let parent_fqcn = format!("{}\\{}", parent_namespace, parent_decl);
        let (parent_use, parent_name) = if parent_namespace == namespace {
            (None, parent_decl)
        } else if parent_decl == self.class_name(is_base, class) || parent_decl == *class {
            // Same short name in a different namespace needs an alias.
            let alias = format!("Base{}", parent_decl);
            (Some(format!("use {} as {};", parent_fqcn, alias)), alias)
        } else {
            (Some(format!("use {};", parent_fqcn)), parent_decl)
        };

        let mut writer = LineWriter::open(storage, path.clone(), self.config.indentation);
        writer.write("<?php").write("");
        writer.write(format!("namespace {};", namespace)).write("");
        if self.config.annotation_prefix == "ORM\\" {
            writer.write(format!("use {};", ORM_MAPPING_USE));
        }
        if let Some(parent_use) = parent_use {
            writer.write(parent_use);
        }
        writer.write("");
        writer.write("/**");
        writer.write(format!(" * {}\\{}", namespace, self.class_name(is_base, class)));
        writer.write(" *");
        writer.write(format!(" * {}", self.entity_annotation(class).render()));
        writer.write(" */");
        let abstract_prefix = if is_base { "abstract " } else { "" };
        writer.write(format!(
            "{}class {} extends {}",
            abstract_prefix,
            self.class_name(is_base, class),
            parent_name
        ));
        writer.write("{");
        writer.write("}");
        writer.close()?;
        written.insert(path);
        Ok(())
    }

    fn write_column_vars(&self, writer: &mut LineWriter, table: &Table) {
        for column in self.emitted_columns(table) {
            writer.write("/**");
            if column.primary {
                writer.write(format!(" * {}", self.annotation("Id").render()));
            }
            writer.write(format!(" * {}", self.column_annotation(column).render()));
            if column.primary && column.auto_increment {
                if let Some(strategy) = self.config.generated_value_strategy.as_annotation() {
                    writer.write(format!(
                        " * {}",
                        self.annotation("GeneratedValue")
                            .opt("strategy", Some(Value::string(strategy)))
                            .render()
                    ));
                }
            }
            writer.write(" */");
            writer.write(format!("protected ${};", column.name));
            writer.write("");
        }
    }

    fn write_relation_vars(
        &self,
        writer: &mut LineWriter,
        table: &Table,
        model: &str,
        inverse_keys: &[&ForeignKey],
        local_keys: &[&ForeignKey],
    ) {
        // Inverse side first: collections and inverse one-to-one references.
        for fk in inverse_keys {
            let declaring = match self.declaring_table_of(fk) {
                Some(declaring) => declaring,
                None => continue,
            };
            let target_model = naming::model_name(declaring);
            let related = related_suffix(self.schema, fk);
            let hints = fk.hints();
            debug!("writing inverse relation `{}` on `{}`", fk.name, table.name);

            let mapped_by = lcfirst(&self.related_var(model, related.as_deref(), false));
            if fk.is_many_to_one(declaring) {
                let annotation = self
                    .annotation("OneToMany")
                    .opt("targetEntity", Some(Value::string(self.fqcn(false, &target_model))))
                    .opt("mappedBy", Some(Value::string(mapped_by)))
                    .opt("cascade", hints.cascade.clone().map(Value::strings))
                    .opt("fetch", hints.fetch.clone().map(Value::Str))
                    .opt("orphanRemoval", hints.orphan_removal.map(Value::Bool));
                writer.write("/**");
                writer.write(format!(" * {}", annotation.render()));
                writer.write(format!(" * {}", self.joins(fk, true).render()));
                if let Some(order) = self.order_annotation(&hints.order) {
                    writer.write(format!(" * {}", order.render()));
                }
                writer.write(" */");
                let field = lcfirst(&self.related_var(&target_model, related.as_deref(), true));
                writer.write(format!("protected ${};", field));
            } else {
                let annotation = self
                    .annotation("OneToOne")
                    .opt("targetEntity", Some(Value::string(self.fqcn(false, &target_model))))
                    .opt("mappedBy", Some(Value::string(mapped_by)))
                    .opt("cascade", hints.cascade.clone().map(Value::strings))
                    .opt("fetch", hints.fetch.clone().map(Value::Str))
                    .opt("orphanRemoval", hints.orphan_removal.map(Value::Bool));
                writer.write("/**");
                writer.write(format!(" * {}", annotation.render()));
                writer.write(" */");
                writer.write(format!("protected ${};", lcfirst(&target_model)));
            }
            writer.write("");
        }

        // Owning side: many-to-one and one-to-one references.
        for fk in local_keys {
            let target_model = naming::model_name_of(&fk.referenced_table);
            let related = related_suffix(self.schema, fk);
            let hints = fk.hints();
            debug!("writing local relation `{}` on `{}`", fk.name, table.name);

            let many_to_one = fk.is_many_to_one(table);
            let inversed_by = if hints.unidirectional {
                None
            } else {
                Some(Value::string(lcfirst(
                    &self.related_var(model, related.as_deref(), many_to_one),
                )))
            };
            let kind = if many_to_one { "ManyToOne" } else { "OneToOne" };
            let annotation = self
                .annotation(kind)
                .opt("targetEntity", Some(Value::string(self.fqcn(false, &target_model))))
                .opt("inversedBy", inversed_by)
                .opt("cascade", hints.cascade.clone().map(Value::strings))
                .opt("fetch", hints.fetch.clone().map(Value::Str));
            writer.write("/**");
            writer.write(format!(" * {}", annotation.render()));
            writer.write(format!(" * {}", self.joins(fk, false).render()));
            writer.write(" */");
            let field = if many_to_one {
                lcfirst(&self.related_var(&target_model, related.as_deref(), false))
            } else {
                lcfirst(&target_model)
            };
            writer.write(format!("protected ${};", field));
            writer.write("");
        }
    }

    fn write_m2m_vars(&self, writer: &mut LineWriter, table: &Table, relations: &[ManyToManyRelation]) {
        for relation in relations {
            let ref_model = naming::model_name_of(&relation.ref_table);
            let hints = relation.reference.hints();
            let owning = relation.is_owning_side(self.schema);
            debug!(
                "writing many-to-many `{}` <=> `{}` via `{}` ({})",
                table.name,
                relation.ref_table,
                relation.junction,
                if owning { "owning" } else { "inverse" }
            );

            if owning {
                let inversed_by = if hints.unidirectional {
                    None
                } else {
                    Some(Value::string(lcfirst(&naming::plural_model_name_of(&table.name))))
                };
                let annotation = self
                    .annotation("ManyToMany")
                    .opt("targetEntity", Some(Value::string(self.fqcn(false, &ref_model))))
                    .opt("inversedBy", inversed_by)
                    .opt("cascade", hints.cascade.clone().map(Value::strings))
                    .opt("fetch", hints.fetch.clone().map(Value::Str));
                let join_table = self
                    .annotation("JoinTable")
                    .opt("name", Some(Value::string(self.quote(&relation.junction))))
                    .opt(
                        "joinColumns",
                        Some(Value::List(vec![self.joins(&relation.reference, false)])),
                    )
                    .opt(
                        "inverseJoinColumns",
                        Some(Value::List(vec![self.joins(&relation.companion, false)])),
                    )
                    .multiline();
                writer.write("/**");
                writer.write(format!(" * {}", annotation.render()));
                writer.write(format!(" * {}", join_table.render()));
                if let Some(order) = self.order_annotation(&relation.companion.hints().order) {
                    writer.write(format!(" * {}", order.render()));
                }
                writer.write(" */");
            } else {
                if relation.companion.hints().unidirectional {
                    debug!(
                        "inverse side of unidirectional many-to-many via `{}` suppressed",
                        relation.junction
                    );
                    continue;
                }
                let annotation = self
                    .annotation("ManyToMany")
                    .opt("targetEntity", Some(Value::string(self.fqcn(false, &ref_model))))
                    .opt(
                        "mappedBy",
                        Some(Value::string(lcfirst(&naming::plural_model_name_of(&table.name)))),
                    );
                writer.write("/**");
                writer.write(format!(" * {}", annotation.render()));
                writer.write(" */");
            }
            writer.write(format!(
                "protected ${};",
                lcfirst(&naming::plural_model_name_of(&relation.ref_table))
            ));
            writer.write("");
        }
    }

    fn write_constructor(
        &self,
        writer: &mut LineWriter,
        inverse_keys: &[&ForeignKey],
        relations: &[ManyToManyRelation],
    ) {
        writer.write("public function __construct()").write("{").indent();
        for fk in inverse_keys {
            let declaring = match self.declaring_table_of(fk) {
                Some(declaring) => declaring,
                None => continue,
            };
            if !fk.is_many_to_one(declaring) {
                continue;
            }
            let target_model = naming::model_name(declaring);
            let related = related_suffix(self.schema, fk);
            let field = lcfirst(&self.related_var(&target_model, related.as_deref(), true));
            writer.write(format!("$this->{} = new ArrayCollection();", field));
        }
        for relation in relations {
            if !relation.is_owning_side(self.schema) && relation.companion.hints().unidirectional {
                continue;
            }
            let field = lcfirst(&naming::plural_model_name_of(&relation.ref_table));
            writer.write(format!("$this->{} = new ArrayCollection();", field));
        }
        writer.outdent().write("}").write("");
    }

    fn write_column_accessors(&self, writer: &mut LineWriter, table: &Table, base: bool, model: &str) {
        let return_fqcn = format!("\\{}", self.fqcn(base, model));
        for column in self.emitted_columns(table) {
            let hint = datatype::php_type_hint(&column.doctrine_type());
            let accessor = column.name.to_camel_case();
            writer
                .write("/**")
                .write(format!(" * Set the value of {}.", column.name))
                .write(" *")
                .write(format!(" * @param {} ${}", hint, column.name))
                .write(format!(" * @return {}", return_fqcn))
                .write(" */")
                .write(format!("public function set{}(${})", accessor, column.name))
                .write("{")
                .indent()
                .write(format!("$this->{} = ${};", column.name, column.name))
                .write("")
                .write("return $this;")
                .outdent()
                .write("}")
                .write("")
                .write("/**")
                .write(format!(" * Get the value of {}.", column.name))
                .write(" *")
                .write(format!(" * @return {}", hint))
                .write(" */")
                .write(format!("public function get{}()", accessor))
                .write("{")
                .indent()
                .write(format!("return $this->{};", column.name))
                .outdent()
                .write("}")
                .write("");
        }
    }

    fn write_relation_accessors(
        &self,
        writer: &mut LineWriter,
        table: &Table,
        model: &str,
        base: bool,
        inverse_keys: &[&ForeignKey],
        local_keys: &[&ForeignKey],
    ) {
        let return_fqcn = format!("\\{}", self.fqcn(base, model));

        for fk in inverse_keys {
            let declaring = match self.declaring_table_of(fk) {
                Some(declaring) => declaring,
                None => continue,
            };
            let target_model = naming::model_name(declaring);
            let related = related_suffix(self.schema, fk);
            let text = related_text(fk).map(|t| format!(" {}", t)).unwrap_or_default();
            let param_fqcn = format!("\\{}", self.fqcn(base, &target_model));
            let param_class = self.class_name(base, &target_model);
            let var = lcfirst(&target_model);

            if fk.is_many_to_one(declaring) {
                let token = self.related_var(&target_model, related.as_deref(), false);
                let plural_token = self.related_var(&target_model, related.as_deref(), true);
                let field = lcfirst(&plural_token);
                writer
                    .write("/**")
                    .write(format!(" * Add {} entity{} to collection (one to many).", target_model, text))
                    .write(" *")
                    .write(format!(" * @param {} ${}", param_fqcn, var))
                    .write(format!(" * @return {}", return_fqcn))
                    .write(" */")
                    .write(format!("public function add{}({} ${})", token, param_class, var))
                    .write("{")
                    .indent()
                    .write(format!("$this->{}[] = ${};", field, var))
                    .write("")
                    .write("return $this;")
                    .outdent()
                    .write("}")
                    .write("")
                    .write("/**")
                    .write(format!(" * Remove {} entity{} from collection (one to many).", target_model, text))
                    .write(" *")
                    .write(format!(" * @param {} ${}", param_fqcn, var))
                    .write(format!(" * @return {}", return_fqcn))
                    .write(" */")
                    .write(format!("public function remove{}({} ${})", token, param_class, var))
                    .write("{")
                    .indent()
                    .write(format!("$this->{}->removeElement(${});", field, var))
                    .write("")
                    .write("return $this;")
                    .outdent()
                    .write("}")
                    .write("")
                    .write("/**")
                    .write(format!(" * Get {} entity{} collection (one to many).", target_model, text))
                    .write(" *")
                    .write(format!(" * @return {}", COLLECTION_INTERFACE))
                    .write(" */")
                    .write(format!("public function get{}()", plural_token))
                    .write("{")
                    .indent()
                    .write(format!("return $this->{};", field))
                    .outdent()
                    .write("}")
                    .write("");
            } else {
                let back_token = self.related_var(model, related.as_deref(), false);
                writer
                    .write("/**")
                    .write(format!(" * Set {} entity (one to one).", target_model))
                    .write(" *")
                    .write(format!(" * @param {} ${}", param_fqcn, var))
                    .write(format!(" * @return {}", return_fqcn))
                    .write(" */")
                    .write(format!("public function set{}({} ${} = null)", target_model, param_class, var))
                    .write("{")
                    .indent()
                    .write(format!("${}->set{}($this);", var, back_token))
                    .write(format!("$this->{} = ${};", var, var))
                    .write("")
                    .write("return $this;")
                    .outdent()
                    .write("}")
                    .write("")
                    .write("/**")
                    .write(format!(" * Get {} entity (one to one).", target_model))
                    .write(" *")
                    .write(format!(" * @return {}", param_fqcn))
                    .write(" */")
                    .write(format!("public function get{}()", target_model))
                    .write("{")
                    .indent()
                    .write(format!("return $this->{};", var))
                    .outdent()
                    .write("}")
                    .write("");
            }
        }

        for fk in local_keys {
            let target_model = naming::model_name_of(&fk.referenced_table);
            let related = related_suffix(self.schema, fk);
            let text = related_text(fk).map(|t| format!(" {}", t)).unwrap_or_default();
            let param_fqcn = format!("\\{}", self.fqcn(base, &target_model));
            let param_class = self.class_name(base, &target_model);
            let var = lcfirst(&target_model);

            if fk.is_many_to_one(table) {
                let token = self.related_var(&target_model, related.as_deref(), false);
                let field = lcfirst(&token);
                writer
                    .write("/**")
                    .write(format!(" * Set {} entity{} (many to one).", target_model, text))
                    .write(" *")
                    .write(format!(" * @param {} ${}", param_fqcn, var))
                    .write(format!(" * @return {}", return_fqcn))
                    .write(" */")
                    .write(format!("public function set{}({} ${} = null)", token, param_class, var))
                    .write("{")
                    .indent()
                    .write(format!("$this->{} = ${};", field, var))
                    .write("")
                    .write("return $this;")
                    .outdent()
                    .write("}")
                    .write("")
                    .write("/**")
                    .write(format!(" * Get {} entity{} (many to one).", target_model, text))
                    .write(" *")
                    .write(format!(" * @return {}", param_fqcn))
                    .write(" */")
                    .write(format!("public function get{}()", token))
                    .write("{")
                    .indent()
                    .write(format!("return $this->{};", field))
                    .outdent()
                    .write("}")
                    .write("");
            } else {
                writer
                    .write("/**")
                    .write(format!(" * Set {} entity (one to one).", target_model))
                    .write(" *")
                    .write(format!(" * @param {} ${}", param_fqcn, var))
                    .write(format!(" * @return {}", return_fqcn))
                    .write(" */")
                    .write(format!("public function set{}({} ${} = null)", target_model, param_class, var))
                    .write("{")
                    .indent()
                    .write(format!("$this->{} = ${};", var, var))
                    .write("")
                    .write("return $this;")
                    .outdent()
                    .write("}")
                    .write("")
                    .write("/**")
                    .write(format!(" * Get {} entity (one to one).", target_model))
                    .write(" *")
                    .write(format!(" * @return {}", param_fqcn))
                    .write(" */")
                    .write(format!("public function get{}()", target_model))
                    .write("{")
                    .indent()
                    .write(format!("return $this->{};", var))
                    .outdent()
                    .write("}")
                    .write("");
            }
        }
    }

    fn write_m2m_accessors(
        &self,
        writer: &mut LineWriter,
        model: &str,
        base: bool,
        relations: &[ManyToManyRelation],
    ) {
        let return_fqcn = format!("\\{}", self.fqcn(base, model));
        for relation in relations {
            let owning = relation.is_owning_side(self.schema);
            if !owning && relation.companion.hints().unidirectional {
                continue;
            }
            let ref_model = naming::model_name_of(&relation.ref_table);
            let plural = naming::plural_model_name_of(&relation.ref_table);
            let field = lcfirst(&plural);
            let param_fqcn = format!("\\{}", self.fqcn(base, &ref_model));
            let param_class = self.class_name(base, &ref_model);
            let var = lcfirst(&ref_model);
            // The owning side keeps the inverse collection in sync, unless
            // the relation is unidirectional and no inverse accessor exists.
            let sync_inverse = owning && !relation.reference.hints().unidirectional;

            writer
                .write("/**")
                .write(format!(" * Add {} entity to collection.", ref_model))
                .write(" *")
                .write(format!(" * @param {} ${}", param_fqcn, var))
                .write(format!(" * @return {}", return_fqcn))
                .write(" */")
                .write(format!("public function add{}({} ${})", ref_model, param_class, var))
                .write("{")
                .indent();
            writer.write_if(sync_inverse, format!("${}->add{}($this);", var, model));
            writer
                .write(format!("$this->{}[] = ${};", field, var))
                .write("")
                .write("return $this;")
                .outdent()
                .write("}")
                .write("")
                .write("/**")
                .write(format!(" * Remove {} entity from collection.", ref_model))
                .write(" *")
                .write(format!(" * @param {} ${}", param_fqcn, var))
                .write(format!(" * @return {}", return_fqcn))
                .write(" */")
                .write(format!("public function remove{}({} ${})", ref_model, param_class, var))
                .write("{")
                .indent();
            writer.write_if(sync_inverse, format!("${}->remove{}($this);", var, model));
            writer
                .write(format!("$this->{}->removeElement(${});", field, var))
                .write("")
                .write("return $this;")
                .outdent()
                .write("}")
                .write("")
                .write("/**")
                .write(format!(" * Get {} entity collection.", ref_model))
                .write(" *")
                .write(format!(" * @return {}", COLLECTION_INTERFACE))
                .write(" */")
                .write(format!("public function get{}()", plural))
                .write("{")
                .indent()
                .write(format!("return $this->{};", field))
                .outdent()
                .write("}")
                .write("");
        }
    }

    fn write_serialization(&self, writer: &mut LineWriter, table: &Table) {
        let columns = self
            .emitted_columns(table)
            .map(|col| format!("'{}'", col.name))
            .collect::<Vec<_>>()
            .join(", ");
        writer
            .write("public function __sleep()")
            .write("{")
            .indent()
            .write(format!("return array({});", columns))
            .outdent()
            .write("}");
    }

    // Derived sequences, filtered through the skip predicates.

    fn inverse_keys(&self, table: &Table) -> Vec<&ForeignKey> {
        self.schema
            .referencing_keys(&table.name)
            .into_iter()
            .filter(|fk| !is_referencing_key_ignored(self.schema, self.config, fk))
            .collect()
    }

    fn local_keys<'t>(&self, table: &'t Table) -> Vec<&'t ForeignKey> {
        table
            .foreign_keys
            .iter()
            .filter(|fk| self.schema.table(&fk.referenced_table).is_some())
            .filter(|fk| !is_local_key_ignored(self.schema, self.config, fk))
            .collect()
    }

    fn m2m_relations(&self, table: &Table) -> Vec<ManyToManyRelation> {
        if !self.config.skip_m2m_tables {
            return Vec::new();
        }
        self.schema.many_to_many_relations(&table.name)
    }

    fn emitted_columns<'t>(&self, table: &'t Table) -> impl Iterator<Item = &'t Column> + 't {
        let skip_related = self.config.skip_column_with_relation;
        table.columns.iter().filter(move |col| {
            if skip_related && table.column_has_relation(&col.name) {
                debug!("column `{}` covered by a relation, skipped", col.name);
                return false;
            }
            true
        })
    }

    fn declaring_table_of(&self, fk: &ForeignKey) -> Option<&Table> {
        self.schema.table(&fk.owning_table)
    }

    // Naming and annotation helpers.

    fn annotation(&self, name: &str) -> Annotation {
        Annotation::new(format!("{}{}", self.config.annotation_prefix, name))
    }

    fn quote(&self, identifier: &str) -> String {
        naming::quote_identifier(identifier, self.config.quote_identifier_strategy)
    }

    fn related_var(&self, name: &str, related: Option<&str>, plural: bool) -> String {
        ucfirst(&naming::related_var_name(
            name,
            related,
            plural,
            &self.config.related_var_name_format,
        ))
    }

    /// Class name within a namespace context: base classes carry a `Base`
    /// prefix only when base and concrete entities share one namespace.
    fn class_name(&self, base: bool, model: &str) -> String {
        if base && self.config.base_shares_namespace() {
            format!("Base{}", model)
        } else {
            model.to_string()
        }
    }

    fn fqcn(&self, base: bool, model: &str) -> String {
        format!("{}\\{}", self.config.entity_namespace(base), self.class_name(base, model))
    }

    fn class_file_name(&self, base: bool, class: &str) -> String {
        let namespace = if base {
            &self.config.base_entity_namespace
        } else {
            &self.config.entity_namespace
        };
        let dir = namespace.replace('\\', "/");
        format!(
            "{}/{}.{}",
            dir,
            self.class_name(base, class),
            self.config.file_extension
        )
    }

    fn entity_annotation(&self, class: &str) -> Annotation {
        let repository = if self.config.automatic_repository {
            Some(Value::string(format!(
                "{}\\{}Repository",
                self.config.repository_namespace(),
                class
            )))
        } else {
            None
        };
        self.annotation("Entity").opt("repositoryClass", repository)
    }

    fn table_annotation(&self, table: &Table) -> Annotation {
        self.annotation("Table")
            .opt("name", Some(Value::string(self.quote(&table.name))))
            .opt("indexes", self.indexes_annotation(table, super::IndexKind::Index, "Index"))
            .opt(
                "uniqueConstraints",
                self.indexes_annotation(table, super::IndexKind::Unique, "UniqueConstraint"),
            )
    }

    fn indexes_annotation(
        &self,
        table: &Table,
        kind: super::IndexKind,
        annotation: &str,
    ) -> Option<Value> {
        let indexes: Vec<Value> = table
            .indexes
            .iter()
            .filter(|index| index.kind == kind)
            .map(|index| {
                Value::Annotation(
                    self.annotation(annotation)
                        .opt("name", Some(Value::string(index.name.as_str())))
                        .opt(
                            "columns",
                            Some(Value::strings(
                                index.columns.iter().map(|c| self.quote(c)).collect::<Vec<_>>(),
                            )),
                        ),
                )
            })
            .collect();
        if indexes.is_empty() {
            None
        } else {
            Some(Value::List(indexes))
        }
    }

    fn column_annotation(&self, column: &Column) -> Annotation {
        let quoted = self.quote(&column.name);
        let name = if quoted != column.name {
            Some(Value::Str(quoted))
        } else {
            None
        };
        self.annotation("Column")
            .opt("name", name)
            .opt("type", Some(Value::string(column.doctrine_type())))
            .opt("length", datatype::length(&column.col_type).map(Value::Int))
            .opt("nullable", column.nullable.then_some(Value::Bool(true)))
    }

    /// Join metadata for one key. `owning_side` selects the perspective:
    /// the referenced table's columns lead for inverse-side joins.
    fn joins(&self, fk: &ForeignKey, owning_side: bool) -> Value {
        let (lead_cols, lead_table, ref_cols) = if owning_side {
            (&fk.foreign_columns, &fk.referenced_table, &fk.local_columns)
        } else {
            (&fk.local_columns, &fk.owning_table, &fk.foreign_columns)
        };
        let on_delete = options::delete_rule(fk.delete_rule.as_deref());
        let mut joins: Vec<Value> = Vec::new();
        for (lead, referenced) in lead_cols.iter().zip(ref_cols.iter()) {
            let nullable = self
                .schema
                .table(lead_table)
                .and_then(|t| t.column(lead))
                .map(|col| col.nullable)
                .unwrap_or(false);
            joins.push(Value::Annotation(
                self.annotation("JoinColumn")
                    .opt("name", Some(Value::string(self.quote(lead))))
                    .opt("referencedColumnName", Some(Value::string(self.quote(referenced))))
                    .opt("nullable", Some(Value::Bool(nullable)))
                    .opt("onDelete", on_delete.clone().map(Value::Str)),
            ));
        }
        if joins.len() > 1 {
            Value::Annotation(self.annotation("JoinColumns").arg(Value::List(joins)))
        } else {
            joins.into_iter().next().unwrap_or_else(|| {
                Value::Annotation(self.annotation("JoinColumn"))
            })
        }
    }

    fn order_annotation(&self, orders: &[(String, options::SortDir)]) -> Option<Annotation> {
        if orders.is_empty() {
            return None;
        }
        let entries = orders
            .iter()
            .map(|(column, dir)| (column.clone(), Value::string(dir.as_str())))
            .collect();
        Some(
            self.annotation("OrderBy")
                .arg(Value::Map(entries, MapStyle::Equals)),
        )
    }
}
