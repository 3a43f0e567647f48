//! Relationship template generator
//!
//! Pure composition of annotation bodies, join metadata, field declarations
//! and identity methods. Every builder returns a [`Fragment`]: the text to
//! splice into a class body plus the imports that text needs.

pub mod naming;
pub mod params;

use crate::error::EditResult;
use crate::mutation::ImportSet;
use crate::relationship::config::{CascadeSet, CascadeType, CollectionType, FetchType, SideOptions};
use crate::syntax::SyntaxTree;
use crate::syntax::locator::has_method;
use naming::{field_name, is_java_reserved, snake_case};
use params::{AnnotationParams, annotation, cascade_value};
use tracing::{debug, warn};

pub const DEFAULT_PERSISTENCE_PACKAGE: &str = "jakarta.persistence";
pub const DEFAULT_INDENT: &str = "\t";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateSettings {
    pub indent: String,
    pub persistence_package: String,
}

impl Default for TemplateSettings {
    fn default() -> Self {
        Self {
            indent: DEFAULT_INDENT.to_string(),
            persistence_package: DEFAULT_PERSISTENCE_PACKAGE.to_string(),
        }
    }
}

/// The bits of a resolved class a template needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityRef<'a> {
    pub class_name: &'a str,
    pub package: Option<&'a str>,
}

impl<'a> EntityRef<'a> {
    pub fn new(class_name: &'a str, package: Option<&'a str>) -> Self {
        Self {
            class_name,
            package,
        }
    }

    pub fn qualified_name(&self) -> String {
        match self.package {
            Some(package) => format!("{package}.{}", self.class_name),
            None => self.class_name.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fragment {
    pub text: String,
    pub imports: ImportSet,
}

/// A plain `@Column` field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnField {
    pub type_name: String,
    pub name: Option<String>,
    pub type_import: Option<String>,
    pub nullable: Option<bool>,
    pub unique: Option<bool>,
    pub length: Option<u32>,
}

#[derive(Debug, Clone, Default)]
pub struct TemplateGenerator {
    settings: TemplateSettings,
}

impl TemplateGenerator {
    pub fn new(settings: TemplateSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &TemplateSettings {
        &self.settings
    }

    fn persistence(&self, name: &str) -> String {
        format!("{}.{name}", self.settings.persistence_package)
    }

    fn block(&self, lines: &[String]) -> String {
        let mut text = String::new();
        for line in lines {
            text.push('\n');
            text.push_str(&self.settings.indent);
            text.push_str(line);
        }
        text.push('\n');
        text
    }

    /// Classes in the default package can't be imported, and a class never
    /// imports itself.
    fn import_other(imports: &mut ImportSet, other: EntityRef<'_>, this: EntityRef<'_>) {
        if other.package.is_some() && other.qualified_name() != this.qualified_name() {
            imports.insert(other.qualified_name());
        }
    }

    fn cascade_param(&self, cascades: &CascadeSet, imports: &mut ImportSet) -> Option<String> {
        let value = cascade_value(cascades)?;
        imports.insert(self.persistence("CascadeType"));
        Some(value)
    }

    fn fetch_param(&self, fetch: Option<FetchType>, imports: &mut ImportSet) -> Option<FetchType> {
        if fetch.is_some() {
            imports.insert(self.persistence("FetchType"));
        }
        fetch
    }

    pub fn join_column(
        &self,
        target_type: &str,
        mandatory: bool,
        unique: bool,
        imports: &mut ImportSet,
    ) -> String {
        imports.insert(self.persistence("JoinColumn"));
        let params = AnnotationParams {
            name: Some(format!("{}_id", snake_case(target_type))),
            nullable: Some(!mandatory),
            unique: Some(unique),
            ..Default::default()
        };
        annotation("JoinColumn", &params)
    }

    pub fn join_table(&self, owning_type: &str, inverse_type: &str, imports: &mut ImportSet) -> String {
        imports.insert(self.persistence("JoinTable"));
        imports.insert(self.persistence("JoinColumn"));
        let owning = snake_case(owning_type);
        let inverse = snake_case(inverse_type);
        format!(
            "@JoinTable(name = \"{owning}_{inverse}\", joinColumns = @JoinColumn(name = \"{owning}_id\"), inverseJoinColumns = @JoinColumn(name = \"{inverse}_id\"))"
        )
    }

    pub fn field_declaration(
        &self,
        type_name: &str,
        collection: Option<CollectionType>,
        imports: &mut ImportSet,
    ) -> String {
        match collection {
            Some(collection) => {
                imports.extend(collection.imports());
                format!(
                    "private {}<{type_name}> {} = new {};",
                    collection.type_name(),
                    field_name(type_name, true),
                    collection.initializer()
                )
            }
            None => format!("private {type_name} {};", field_name(type_name, false)),
        }
    }

    /// `equals`/`hashCode` for `class_name`, or `None` when the class
    /// already declares either one.
    pub fn identity_methods(&self, class_name: &str, tree: &SyntaxTree) -> EditResult<Option<Fragment>> {
        let has_equals = has_method(tree, "equals")?;
        let has_hash_code = has_method(tree, "hashCode")?;
        if has_equals || has_hash_code {
            debug!(
                component = "generator",
                operation = "identity_methods",
                class = class_name,
                has_equals,
                has_hash_code,
                "identity methods already present, skipping"
            );
            return Ok(None);
        }

        let mut var = snake_case(class_name);
        if var == "o" || is_java_reserved(&var) {
            var = "other".to_string();
        }
        let lines: Vec<(usize, String)> = vec![
            (1, "@Override".into()),
            (1, "public final boolean equals(Object o) {".into()),
            (2, "if (this == o) return true;".into()),
            (2, "if (o == null) return false;".into()),
            (2, "Class<?> oEffectiveClass = o instanceof HibernateProxy".into()),
            (4, "? ((HibernateProxy) o).getHibernateLazyInitializer().getPersistentClass()".into()),
            (4, ": o.getClass();".into()),
            (2, "Class<?> thisEffectiveClass = this instanceof HibernateProxy".into()),
            (4, "? ((HibernateProxy) this).getHibernateLazyInitializer().getPersistentClass()".into()),
            (4, ": this.getClass();".into()),
            (2, "if (thisEffectiveClass != oEffectiveClass) return false;".into()),
            (2, format!("{class_name} {var} = ({class_name}) o;")),
            (2, format!("return getId() != null && Objects.equals(getId(), {var}.getId());")),
            (1, "}".into()),
            (0, String::new()),
            (1, "@Override".into()),
            (1, "public final int hashCode() {".into()),
            (2, "return this instanceof HibernateProxy".into()),
            (4, "? ((HibernateProxy) this).getHibernateLazyInitializer().getPersistentClass().hashCode()".into()),
            (4, ": getClass().hashCode();".into()),
            (1, "}".into()),
        ];

        let mut text = String::new();
        for (depth, line) in &lines {
            text.push('\n');
            if !line.is_empty() {
                text.push_str(&self.settings.indent.repeat(*depth));
                text.push_str(line);
            }
        }
        text.push('\n');

        let imports: ImportSet = ["org.hibernate.proxy.HibernateProxy", "java.util.Objects"]
            .into_iter()
            .collect();
        Ok(Some(Fragment { text, imports }))
    }

    /// Owning side of a many-to-one: the foreign key lives here.
    pub fn many_to_one(
        &self,
        owning: EntityRef<'_>,
        inverse: EntityRef<'_>,
        fetch: Option<FetchType>,
        side: &SideOptions,
    ) -> Fragment {
        let mut imports = ImportSet::new();
        imports.insert(self.persistence("ManyToOne"));
        Self::import_other(&mut imports, inverse, owning);
        let params = AnnotationParams {
            optional: Some(!side.mandatory),
            fetch: self.fetch_param(fetch, &mut imports),
            cascade: self.cascade_param(&side.cascades, &mut imports),
            ..Default::default()
        };
        let head = annotation("ManyToOne", &params);
        let join = self.join_column(inverse.class_name, side.mandatory, side.unique, &mut imports);
        let field = self.field_declaration(inverse.class_name, None, &mut imports);
        self.finish("many_to_one", &[head, join, field], imports)
    }

    /// Collection side mirroring a many-to-one, written into the inverse file.
    pub fn one_to_many(
        &self,
        owning: EntityRef<'_>,
        inverse: EntityRef<'_>,
        side: &SideOptions,
        collection: CollectionType,
    ) -> Fragment {
        let mut imports = ImportSet::new();
        imports.insert(self.persistence("OneToMany"));
        Self::import_other(&mut imports, owning, inverse);
        let params = AnnotationParams {
            mapped_by: Some(snake_case(owning.class_name)),
            orphan_removal: side.orphan_removal.then_some(true),
            cascade: self.cascade_param(&side.cascades, &mut imports),
            ..Default::default()
        };
        let head = annotation("OneToMany", &params);
        let field = self.field_declaration(owning.class_name, Some(collection), &mut imports);
        self.finish("one_to_many", &[head, field], imports)
    }

    pub fn one_to_one_owning(
        &self,
        owning: EntityRef<'_>,
        inverse: EntityRef<'_>,
        side: &SideOptions,
    ) -> Fragment {
        let mut imports = ImportSet::new();
        imports.insert(self.persistence("OneToOne"));
        Self::import_other(&mut imports, inverse, owning);
        let params = AnnotationParams {
            optional: Some(!side.mandatory),
            orphan_removal: side.orphan_removal.then_some(true),
            cascade: self.cascade_param(&side.cascades, &mut imports),
            ..Default::default()
        };
        let head = annotation("OneToOne", &params);
        let join = self.join_column(inverse.class_name, side.mandatory, side.unique, &mut imports);
        let field = self.field_declaration(inverse.class_name, None, &mut imports);
        self.finish("one_to_one_owning", &[head, join, field], imports)
    }

    pub fn one_to_one_inverse(
        &self,
        owning: EntityRef<'_>,
        inverse: EntityRef<'_>,
        side: &SideOptions,
    ) -> Fragment {
        let mut imports = ImportSet::new();
        imports.insert(self.persistence("OneToOne"));
        Self::import_other(&mut imports, owning, inverse);
        let params = AnnotationParams {
            mapped_by: Some(snake_case(inverse.class_name)),
            optional: Some(!side.mandatory),
            orphan_removal: side.orphan_removal.then_some(true),
            cascade: self.cascade_param(&side.cascades, &mut imports),
            ..Default::default()
        };
        let head = annotation("OneToOne", &params);
        let field = self.field_declaration(owning.class_name, None, &mut imports);
        self.finish("one_to_one_inverse", &[head, field], imports)
    }

    pub fn many_to_many_owning(
        &self,
        owning: EntityRef<'_>,
        inverse: EntityRef<'_>,
        side: &SideOptions,
    ) -> Fragment {
        let mut imports = ImportSet::new();
        imports.insert(self.persistence("ManyToMany"));
        Self::import_other(&mut imports, inverse, owning);
        let cascades = without_remove(&side.cascades);
        let params = AnnotationParams {
            cascade: self.cascade_param(&cascades, &mut imports),
            ..Default::default()
        };
        let head = annotation("ManyToMany", &params);
        let table = self.join_table(owning.class_name, inverse.class_name, &mut imports);
        let field =
            self.field_declaration(inverse.class_name, Some(CollectionType::Set), &mut imports);
        self.finish("many_to_many_owning", &[head, table, field], imports)
    }

    /// `mappedBy` side; appends identity methods when requested and the
    /// inverse class has neither `equals` nor `hashCode` yet.
    pub fn many_to_many_inverse(
        &self,
        owning: EntityRef<'_>,
        inverse: EntityRef<'_>,
        side: &SideOptions,
        inverse_tree: &SyntaxTree,
    ) -> EditResult<Fragment> {
        let mut imports = ImportSet::new();
        imports.insert(self.persistence("ManyToMany"));
        Self::import_other(&mut imports, owning, inverse);
        let cascades = without_remove(&side.cascades);
        let params = AnnotationParams {
            mapped_by: Some(snake_case(inverse.class_name)),
            cascade: self.cascade_param(&cascades, &mut imports),
            ..Default::default()
        };
        let head = annotation("ManyToMany", &params);
        let field =
            self.field_declaration(owning.class_name, Some(CollectionType::Set), &mut imports);
        let mut fragment = self.finish("many_to_many_inverse", &[head, field], imports);

        if side.equals_hash_code
            && let Some(identity) = self.identity_methods(inverse.class_name, inverse_tree)?
        {
            fragment.text.push_str(&identity.text);
            fragment.imports.merge(&identity.imports);
        }
        Ok(fragment)
    }

    pub fn column_field(&self, field: &ColumnField) -> Fragment {
        let mut imports = ImportSet::new();
        imports.insert(self.persistence("Column"));
        if let Some(type_import) = &field.type_import {
            imports.insert(type_import.clone());
        }
        let params = AnnotationParams {
            nullable: field.nullable,
            unique: field.unique,
            length: field.length,
            ..Default::default()
        };
        let head = annotation("Column", &params);
        let name = field
            .name
            .clone()
            .unwrap_or_else(|| field_name(&field.type_name, false));
        let body = format!("private {} {name};", field.type_name);
        self.finish("column_field", &[head, body], imports)
    }

    fn finish(&self, operation: &'static str, lines: &[String], imports: ImportSet) -> Fragment {
        let text = self.block(lines);
        debug!(
            component = "generator",
            operation,
            imports = imports.len(),
            text = %text,
            "fragment built"
        );
        Fragment { text, imports }
    }
}

/// Many-to-many associations never cascade removal.
fn without_remove(cascades: &CascadeSet) -> CascadeSet {
    let mut cascades = cascades.clone();
    if cascades.remove(CascadeType::Remove) {
        warn!(
            component = "generator",
            operation = "many_to_many",
            "REMOVE cascade dropped for many-to-many association"
        );
    }
    cascades
}
