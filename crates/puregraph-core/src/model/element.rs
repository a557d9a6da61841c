use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::diagram::Diagram;
use super::domain::{
    Association, Class, ConcreteFunctionDefinition, Enumeration, Profile, StereotypeReference,
    TaggedValue,
};
use super::generation::GenerationSpecification;
use super::mapping::Mapping;
use super::section::SectionIndex;
use super::store::{Database, FlatData};
use crate::reference::ElementReference;

/// Handle of an element inside its owning [`Graph`](crate::graph::Graph)
///
/// Handles are never reused, so a handle held by a reference stays valid
/// (and keeps pointing at the same element) even after the element has been
/// detached from the package tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementId(u32);

impl ElementId {
    pub(crate) fn from_index(index: usize) -> Self {
        Self(index as u32)
    }

    /// 0-based slot in the graph's element table
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Element kind
///
/// Core kinds form a closed set; kinds contributed by registered element
/// builders are carried as `Extension` with their registered name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ElementKind {
    Package,
    PrimitiveType,
    Profile,
    Class,
    Enumeration,
    Association,
    Function,
    Mapping,
    Database,
    FlatData,
    Diagram,
    GenerationSpecification,
    SectionIndex,
    Extension(String),
}

impl ElementKind {
    /// Stable lowercase label used in lookups, logs and the CLI
    pub fn label(&self) -> &str {
        match self {
            ElementKind::Package => "package",
            ElementKind::PrimitiveType => "primitive",
            ElementKind::Profile => "profile",
            ElementKind::Class => "class",
            ElementKind::Enumeration => "enumeration",
            ElementKind::Association => "association",
            ElementKind::Function => "function",
            ElementKind::Mapping => "mapping",
            ElementKind::Database => "database",
            ElementKind::FlatData => "flatdata",
            ElementKind::Diagram => "diagram",
            ElementKind::GenerationSpecification => "generation",
            ElementKind::SectionIndex => "sectionindex",
            ElementKind::Extension(name) => name,
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ElementKind {
    type Err = std::convert::Infallible;

    /// Unknown labels are taken as extension kind names
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "package" => ElementKind::Package,
            "primitive" => ElementKind::PrimitiveType,
            "profile" => ElementKind::Profile,
            "class" => ElementKind::Class,
            "enumeration" => ElementKind::Enumeration,
            "association" => ElementKind::Association,
            "function" => ElementKind::Function,
            "mapping" => ElementKind::Mapping,
            "database" => ElementKind::Database,
            "flatdata" => ElementKind::FlatData,
            "diagram" => ElementKind::Diagram,
            "generation" => ElementKind::GenerationSpecification,
            "sectionindex" => ElementKind::SectionIndex,
            other => ElementKind::Extension(other.to_string()),
        })
    }
}

/// Package body: an ordered list of exclusively owned children
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Package {
    pub children: Vec<ElementId>,
}

/// Element contributed by a registered extension builder
#[derive(Debug, Clone, PartialEq)]
pub struct ExtensionElement {
    pub kind_name: String,
    /// Raw protocol content, minus the linked reference fields
    pub content: serde_json::Value,
    /// Linked references keyed by field name, in declaration order
    pub references: Vec<(String, ElementReference)>,
}

/// Kind-specific element content
#[derive(Debug, Clone, PartialEq)]
pub enum ElementBody {
    Package(Package),
    PrimitiveType,
    Profile(Profile),
    Class(Class),
    Enumeration(Enumeration),
    Association(Association),
    Function(ConcreteFunctionDefinition),
    Mapping(Mapping),
    Database(Database),
    FlatData(FlatData),
    Diagram(Diagram),
    GenerationSpecification(GenerationSpecification),
    SectionIndex(SectionIndex),
    Extension(ExtensionElement),
}

impl ElementBody {
    /// Kind of this body
    pub fn kind(&self) -> ElementKind {
        match self {
            ElementBody::Package(_) => ElementKind::Package,
            ElementBody::PrimitiveType => ElementKind::PrimitiveType,
            ElementBody::Profile(_) => ElementKind::Profile,
            ElementBody::Class(_) => ElementKind::Class,
            ElementBody::Enumeration(_) => ElementKind::Enumeration,
            ElementBody::Association(_) => ElementKind::Association,
            ElementBody::Function(_) => ElementKind::Function,
            ElementBody::Mapping(_) => ElementKind::Mapping,
            ElementBody::Database(_) => ElementKind::Database,
            ElementBody::FlatData(_) => ElementKind::FlatData,
            ElementBody::Diagram(_) => ElementKind::Diagram,
            ElementBody::GenerationSpecification(_) => ElementKind::GenerationSpecification,
            ElementBody::SectionIndex(_) => ElementKind::SectionIndex,
            ElementBody::Extension(ext) => ElementKind::Extension(ext.kind_name.clone()),
        }
    }

    /// Empty body of the given kind, used for registration stubs
    pub fn skeleton(kind: &ElementKind) -> Self {
        match kind {
            ElementKind::Package => ElementBody::Package(Package::default()),
            ElementKind::PrimitiveType => ElementBody::PrimitiveType,
            ElementKind::Profile => ElementBody::Profile(Profile::default()),
            ElementKind::Class => ElementBody::Class(Class::default()),
            ElementKind::Enumeration => ElementBody::Enumeration(Enumeration::default()),
            ElementKind::Association => ElementBody::Association(Association::default()),
            ElementKind::Function => ElementBody::Function(ConcreteFunctionDefinition::default()),
            ElementKind::Mapping => ElementBody::Mapping(Mapping::default()),
            ElementKind::Database => ElementBody::Database(Database::default()),
            ElementKind::FlatData => ElementBody::FlatData(FlatData::default()),
            ElementKind::Diagram => ElementBody::Diagram(Diagram::default()),
            ElementKind::GenerationSpecification => {
                ElementBody::GenerationSpecification(GenerationSpecification::default())
            }
            ElementKind::SectionIndex => ElementBody::SectionIndex(SectionIndex::default()),
            ElementKind::Extension(name) => ElementBody::Extension(ExtensionElement {
                kind_name: name.clone(),
                content: serde_json::Value::Null,
                references: Vec::new(),
            }),
        }
    }
}

impl ElementBody {
    /// Every outgoing reference, labelled with the field it sits in
    pub fn references(&self) -> Vec<(&str, &ElementReference)> {
        let mut out = Vec::new();
        match self {
            ElementBody::Package(_)
            | ElementBody::PrimitiveType
            | ElementBody::Profile(_)
            | ElementBody::SectionIndex(_) => {}
            ElementBody::Class(class) => {
                out.extend(class.generalizations.iter().map(|r| ("superTypes", r)));
                for property in &class.properties {
                    out.push(("properties.type", &property.generic_type));
                    annotations(&mut out, &property.stereotypes, &property.tagged_values);
                }
                annotations(&mut out, &class.stereotypes, &class.tagged_values);
            }
            ElementBody::Enumeration(e) => annotations(&mut out, &e.stereotypes, &e.tagged_values),
            ElementBody::Association(a) => {
                out.extend(a.properties.iter().map(|p| ("properties.type", &p.generic_type)));
                annotations(&mut out, &a.stereotypes, &a.tagged_values);
            }
            ElementBody::Function(f) => {
                out.extend(f.parameters.iter().map(|p| ("parameters.type", &p.parameter_type)));
                out.extend(f.return_type.iter().map(|r| ("returnType", r)));
                annotations(&mut out, &f.stereotypes, &f.tagged_values);
            }
            ElementBody::Mapping(m) => {
                out.extend(m.includes.iter().map(|r| ("includes", r)));
                for cm in &m.class_mappings {
                    out.push(("classMappings.class", &cm.class));
                    out.extend(cm.source_class.iter().map(|r| ("classMappings.srcClass", r)));
                    out.extend(cm.store.iter().map(|r| ("classMappings.store", r)));
                }
                out.extend(
                    m.enumeration_mappings
                        .iter()
                        .map(|em| ("enumerationMappings.enumeration", &em.enumeration)),
                );
            }
            ElementBody::Database(db) => out.extend(db.includes.iter().map(|r| ("includes", r))),
            ElementBody::FlatData(fd) => out.extend(fd.includes.iter().map(|r| ("includes", r))),
            ElementBody::Diagram(d) => {
                out.extend(d.class_views.iter().map(|v| ("classViews.class", &v.class)));
                out.extend(
                    d.property_views
                        .iter()
                        .map(|v| ("propertyViews.property.class", &v.owning_class)),
                );
            }
            ElementBody::GenerationSpecification(g) => out.extend(
                g.generation_nodes
                    .iter()
                    .map(|n| ("generationNodes.generationElement", &n.generation_element)),
            ),
            ElementBody::Extension(ext) => {
                out.extend(ext.references.iter().map(|(field, r)| (field.as_str(), r)));
            }
        }
        out
    }
}

fn annotations<'a>(
    out: &mut Vec<(&'a str, &'a ElementReference)>,
    stereotypes: &'a [StereotypeReference],
    tagged_values: &'a [TaggedValue],
) {
    out.extend(stereotypes.iter().map(|s| ("stereotypes", &s.profile)));
    out.extend(tagged_values.iter().map(|t| ("taggedValues", &t.profile)));
}

/// A named, path-addressable unit of the model
///
/// `package` is a non-owning back-pointer to the owning package; it is
/// `None` only for the root package and for built-in primitive types.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub(crate) name: String,
    pub(crate) package: Option<ElementId>,
    pub(crate) body: ElementBody,
    pub(crate) stub: bool,
}

impl Element {
    /// New element that still awaits linking
    pub fn stub(name: impl Into<String>, body: ElementBody) -> Self {
        Self {
            name: name.into(),
            package: None,
            body,
            stub: true,
        }
    }

    /// New fully populated element
    pub fn new(name: impl Into<String>, body: ElementBody) -> Self {
        Self {
            stub: false,
            ..Self::stub(name, body)
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn package(&self) -> Option<ElementId> {
        self.package
    }

    pub fn kind(&self) -> ElementKind {
        self.body.kind()
    }

    pub fn body(&self) -> &ElementBody {
        &self.body
    }

    /// Mutable access to the kind-specific fields
    ///
    /// Changing the body never affects the element's path, so indices stay valid.
    pub fn body_mut(&mut self) -> &mut ElementBody {
        &mut self.body
    }

    /// Registered but not yet linked
    pub fn is_stub(&self) -> bool {
        self.stub
    }

    pub(crate) fn mark_linked(&mut self) {
        self.stub = false;
    }

    /// Children when this element is a package
    pub fn children(&self) -> &[ElementId] {
        match &self.body {
            ElementBody::Package(pkg) => &pkg.children,
            _ => &[],
        }
    }

    pub fn is_package(&self) -> bool {
        matches!(self.body, ElementBody::Package(_))
    }
}
