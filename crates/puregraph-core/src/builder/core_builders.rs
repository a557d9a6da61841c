//! Builders for the core element kinds

use std::collections::HashSet;

use serde_json::Value;

use super::context::{LinkContext, STORE_KINDS, TYPE_KINDS};
use super::protocol::{
    self, Annotations, AssociationProtocol, ClassProtocol, DatabaseProtocol, DiagramProtocol,
    EnumerationProtocol, FlatDataProtocol, FunctionProtocol, GenerationSpecificationProtocol,
    MappingProtocol, MultiplicityProtocol, PointProtocol, ProfileProtocol, PropertyProtocol,
    SectionIndexProtocol,
};
use super::registry::ElementBuilder;
use crate::errors::{GraphError, Result};
use crate::model::diagram::{ClassView, Diagram, GeneralizationView, Point, PropertyView, Rectangle};
use crate::model::domain::{
    Association, Class, ConcreteFunctionDefinition, Constraint, Enumeration, Multiplicity,
    Parameter, Profile, Property, StereotypeReference, TaggedValue,
};
use crate::model::generation::{GenerationNode, GenerationSpecification};
use crate::model::mapping::{
    ClassMapping, EnumValueMapping, EnumerationMapping, Mapping, PropertyMapping,
};
use crate::model::section::{Section, SectionIndex};
use crate::model::store::{
    Column, Database, FlatData, FlatDataField, FlatDataSection, Filter, Join, Schema, Table,
};
use crate::model::{ElementBody, ElementKind};
use crate::path::to_mapping_element_id;

pub const PACKAGE_CLASSIFIER_PATH: &str = "meta::pure::metamodel::Package";
pub const PROFILE_CLASSIFIER_PATH: &str = "meta::pure::metamodel::extension::Profile";
pub const CLASS_CLASSIFIER_PATH: &str = "meta::pure::metamodel::type::Class";
pub const ENUMERATION_CLASSIFIER_PATH: &str = "meta::pure::metamodel::type::Enumeration";
pub const ASSOCIATION_CLASSIFIER_PATH: &str = "meta::pure::metamodel::relationship::Association";
pub const FUNCTION_CLASSIFIER_PATH: &str =
    "meta::pure::metamodel::function::ConcreteFunctionDefinition";
pub const MAPPING_CLASSIFIER_PATH: &str = "meta::pure::mapping::Mapping";
pub const DATABASE_CLASSIFIER_PATH: &str = "meta::relational::metamodel::Database";
pub const FLAT_DATA_CLASSIFIER_PATH: &str = "meta::flatData::metamodel::FlatData";
pub const DIAGRAM_CLASSIFIER_PATH: &str = "meta::pure::metamodel::diagram::Diagram";
pub const GENERATION_SPECIFICATION_CLASSIFIER_PATH: &str =
    "meta::pure::generation::metamodel::GenerationSpecification";
pub const SECTION_INDEX_CLASSIFIER_PATH: &str = "meta::pure::metamodel::section::SectionIndex";

pub(crate) fn all() -> Vec<Box<dyn ElementBuilder>> {
    vec![
        Box::new(ProfileBuilder),
        Box::new(ClassBuilder),
        Box::new(EnumerationBuilder),
        Box::new(AssociationBuilder),
        Box::new(FunctionBuilder),
        Box::new(MappingBuilder),
        Box::new(DatabaseBuilder),
        Box::new(FlatDataBuilder),
        Box::new(DiagramBuilder),
        Box::new(GenerationSpecificationBuilder),
        Box::new(SectionIndexBuilder),
    ]
}

// ===== shared linking helpers =====

fn multiplicity(ctx: &mut LinkContext<'_>, field: &str, m: MultiplicityProtocol) -> Multiplicity {
    let multiplicity = Multiplicity {
        lower: m.lower_bound,
        upper: m.upper_bound,
    };
    if !multiplicity.is_valid() {
        ctx.invalid(format!("{}: invalid multiplicity {}", field, multiplicity));
    }
    multiplicity
}

fn stereotypes(ctx: &mut LinkContext<'_>, annotations: &Annotations) -> Vec<StereotypeReference> {
    let mut out = Vec::new();
    for ptr in &annotations.stereotypes {
        let Some(profile) = ctx.resolve("stereotypes", &ptr.profile, &[ElementKind::Profile]) else {
            continue;
        };
        if !ctx.profile_declares(&profile, |p| p.stereotypes.contains(&ptr.value)) {
            ctx.record(GraphError::UnresolvedReference {
                reference: format!("{}.{}", ptr.profile, ptr.value),
                element: ctx.element_path().to_string(),
                field: "stereotypes".to_string(),
            });
            continue;
        }
        out.push(StereotypeReference {
            profile,
            value: ptr.value.clone(),
        });
    }
    out
}

fn tagged_values(ctx: &mut LinkContext<'_>, annotations: &Annotations) -> Vec<TaggedValue> {
    let mut out = Vec::new();
    for tagged in &annotations.tagged_values {
        let Some(profile) = ctx.resolve("taggedValues", &tagged.tag.profile, &[ElementKind::Profile])
        else {
            continue;
        };
        if !ctx.profile_declares(&profile, |p| p.tags.contains(&tagged.tag.value)) {
            ctx.record(GraphError::UnresolvedReference {
                reference: format!("{}.{}", tagged.tag.profile, tagged.tag.value),
                element: ctx.element_path().to_string(),
                field: "taggedValues".to_string(),
            });
            continue;
        }
        out.push(TaggedValue {
            profile,
            tag: tagged.tag.value.clone(),
            value: tagged.value.clone(),
        });
    }
    out
}

fn properties(
    ctx: &mut LinkContext<'_>,
    protocols: &[PropertyProtocol],
    expected: &[ElementKind],
) -> Vec<Property> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for p in protocols {
        if !seen.insert(p.name.as_str()) {
            ctx.invalid(format!("duplicate property '{}'", p.name));
            continue;
        }
        let field = format!("properties.{}", p.name);
        let multiplicity = multiplicity(ctx, &field, p.multiplicity);
        let stereotypes = stereotypes(ctx, &p.annotations);
        let tagged_values = tagged_values(ctx, &p.annotations);
        if let Some(generic_type) = ctx.resolve(&field, &p.property_type, expected) {
            out.push(Property {
                name: p.name.clone(),
                generic_type,
                multiplicity,
                stereotypes,
                tagged_values,
            });
        }
    }
    out
}

fn points(protocols: &[PointProtocol]) -> Vec<Point> {
    protocols.iter().map(|p| Point { x: p.x, y: p.y }).collect()
}

/// Report every repeated value of `ids`
fn check_unique<'s>(ctx: &mut LinkContext<'_>, what: &str, ids: impl IntoIterator<Item = &'s str>) {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            ctx.invalid(format!("duplicate {} '{}'", what, id));
        }
    }
}

fn check_view(ctx: &mut LinkContext<'_>, view_ids: &HashSet<&str>, id: &str) {
    if !view_ids.contains(id) {
        ctx.invalid(format!("unknown class view '{}'", id));
    }
}

// ===== builders =====

/// Profiles carry no references, so they are complete after registration
pub struct ProfileBuilder;

impl ProfileBuilder {
    fn build(path: &str, content: &Value) -> Result<ElementBody> {
        let p: ProfileProtocol = protocol::parse(path, content)?;
        Ok(ElementBody::Profile(Profile {
            stereotypes: p.stereotypes,
            tags: p.tags,
        }))
    }
}

impl ElementBuilder for ProfileBuilder {
    fn kind(&self) -> ElementKind {
        ElementKind::Profile
    }

    fn classifier_path(&self) -> &str {
        PROFILE_CLASSIFIER_PATH
    }

    fn first_pass(&self, path: &str, content: &Value) -> Result<ElementBody> {
        Self::build(path, content)
    }

    fn second_pass(&self, content: &Value, ctx: &mut LinkContext<'_>) -> Result<ElementBody> {
        Self::build(ctx.element_path(), content)
    }
}

pub struct ClassBuilder;

impl ElementBuilder for ClassBuilder {
    fn kind(&self) -> ElementKind {
        ElementKind::Class
    }

    fn classifier_path(&self) -> &str {
        CLASS_CLASSIFIER_PATH
    }

    fn second_pass(&self, content: &Value, ctx: &mut LinkContext<'_>) -> Result<ElementBody> {
        let p: ClassProtocol = protocol::parse(ctx.element_path(), content)?;
        let generalizations = ctx.resolve_all("superTypes", &p.super_types, &[ElementKind::Class]);
        if generalizations
            .iter()
            .any(|g| ctx.graph().path_of(g.value()) == ctx.element_path())
        {
            ctx.invalid("class cannot extend itself");
        }
        let properties = properties(ctx, &p.properties, TYPE_KINDS);
        check_unique(ctx, "constraint", p.constraints.iter().map(|c| c.name.as_str()));
        Ok(ElementBody::Class(Class {
            generalizations,
            properties,
            constraints: p
                .constraints
                .into_iter()
                .map(|c| Constraint {
                    name: c.name,
                    function_definition: c.function_definition,
                })
                .collect(),
            stereotypes: stereotypes(ctx, &p.annotations),
            tagged_values: tagged_values(ctx, &p.annotations),
        }))
    }
}

pub struct EnumerationBuilder;

impl ElementBuilder for EnumerationBuilder {
    fn kind(&self) -> ElementKind {
        ElementKind::Enumeration
    }

    fn classifier_path(&self) -> &str {
        ENUMERATION_CLASSIFIER_PATH
    }

    fn second_pass(&self, content: &Value, ctx: &mut LinkContext<'_>) -> Result<ElementBody> {
        let p: EnumerationProtocol = protocol::parse(ctx.element_path(), content)?;
        check_unique(ctx, "enum value", p.values.iter().map(|v| v.value.as_str()));
        Ok(ElementBody::Enumeration(Enumeration {
            values: p.values.into_iter().map(|v| v.value).collect(),
            stereotypes: stereotypes(ctx, &p.annotations),
            tagged_values: tagged_values(ctx, &p.annotations),
        }))
    }
}

pub struct AssociationBuilder;

impl ElementBuilder for AssociationBuilder {
    fn kind(&self) -> ElementKind {
        ElementKind::Association
    }

    fn classifier_path(&self) -> &str {
        ASSOCIATION_CLASSIFIER_PATH
    }

    fn second_pass(&self, content: &Value, ctx: &mut LinkContext<'_>) -> Result<ElementBody> {
        let p: AssociationProtocol = protocol::parse(ctx.element_path(), content)?;
        if p.properties.len() != 2 {
            ctx.invalid(format!(
                "association needs exactly 2 properties, found {}",
                p.properties.len()
            ));
        }
        Ok(ElementBody::Association(Association {
            properties: properties(ctx, &p.properties, &[ElementKind::Class]),
            stereotypes: stereotypes(ctx, &p.annotations),
            tagged_values: tagged_values(ctx, &p.annotations),
        }))
    }
}

pub struct FunctionBuilder;

impl ElementBuilder for FunctionBuilder {
    fn kind(&self) -> ElementKind {
        ElementKind::Function
    }

    fn classifier_path(&self) -> &str {
        FUNCTION_CLASSIFIER_PATH
    }

    fn second_pass(&self, content: &Value, ctx: &mut LinkContext<'_>) -> Result<ElementBody> {
        let p: FunctionProtocol = protocol::parse(ctx.element_path(), content)?;
        check_unique(ctx, "parameter", p.parameters.iter().map(|p| p.name.as_str()));
        let mut parameters = Vec::new();
        for param in &p.parameters {
            let field = format!("parameters.{}", param.name);
            let multiplicity = multiplicity(ctx, &field, param.multiplicity);
            if let Some(parameter_type) = ctx.resolve(&field, &param.parameter_type, TYPE_KINDS) {
                parameters.push(Parameter {
                    name: param.name.clone(),
                    parameter_type,
                    multiplicity,
                });
            }
        }
        let return_type = p
            .return_type
            .as_deref()
            .and_then(|input| ctx.resolve("returnType", input, TYPE_KINDS));
        let return_multiplicity = p
            .return_multiplicity
            .map(|m| multiplicity(ctx, "returnMultiplicity", m))
            .unwrap_or_default();
        Ok(ElementBody::Function(ConcreteFunctionDefinition {
            parameters,
            return_type,
            return_multiplicity,
            body: p.body,
            stereotypes: stereotypes(ctx, &p.annotations),
            tagged_values: tagged_values(ctx, &p.annotations),
        }))
    }
}

pub struct MappingBuilder;

impl ElementBuilder for MappingBuilder {
    fn kind(&self) -> ElementKind {
        ElementKind::Mapping
    }

    fn classifier_path(&self) -> &str {
        MAPPING_CLASSIFIER_PATH
    }

    fn second_pass(&self, content: &Value, ctx: &mut LinkContext<'_>) -> Result<ElementBody> {
        let p: MappingProtocol = protocol::parse(ctx.element_path(), content)?;
        let includes = p
            .includes
            .iter()
            .filter_map(|i| ctx.resolve("includes", &i.included_mapping, &[ElementKind::Mapping]))
            .collect();

        let mut class_mappings = Vec::new();
        for cm in p.class_mappings {
            let Some(class) = ctx.resolve("classMappings.class", &cm.class, &[ElementKind::Class])
            else {
                continue;
            };
            let source_class = cm
                .src_class
                .as_deref()
                .and_then(|input| ctx.resolve("classMappings.srcClass", input, &[ElementKind::Class]));
            let store = cm
                .store
                .as_deref()
                .and_then(|input| ctx.resolve("classMappings.store", input, STORE_KINDS));
            let id = cm
                .id
                .unwrap_or_else(|| to_mapping_element_id(&ctx.graph().path_of(class.value())));
            class_mappings.push(ClassMapping {
                id,
                class,
                root: cm.root,
                source_class,
                store,
                property_mappings: cm
                    .property_mappings
                    .into_iter()
                    .map(|pm| PropertyMapping {
                        property: pm.property,
                        source: pm.source,
                        target: pm.target,
                        transform: pm.transform,
                    })
                    .collect(),
            });
        }
        check_unique(
            ctx,
            "class mapping id",
            class_mappings.iter().map(|cm: &ClassMapping| cm.id.as_str()),
        );

        let mut enumeration_mappings = Vec::new();
        for em in p.enumeration_mappings {
            let Some(enumeration) = ctx.resolve(
                "enumerationMappings.enumeration",
                &em.enumeration,
                &[ElementKind::Enumeration],
            ) else {
                continue;
            };
            let id = em
                .id
                .unwrap_or_else(|| to_mapping_element_id(&ctx.graph().path_of(enumeration.value())));
            enumeration_mappings.push(EnumerationMapping {
                id,
                enumeration,
                value_mappings: em
                    .enum_value_mappings
                    .into_iter()
                    .map(|vm| EnumValueMapping {
                        enum_value: vm.enum_value,
                        source_values: vm.source_values,
                    })
                    .collect(),
            });
        }

        Ok(ElementBody::Mapping(Mapping {
            includes,
            class_mappings,
            enumeration_mappings,
        }))
    }
}

pub struct DatabaseBuilder;

impl ElementBuilder for DatabaseBuilder {
    fn kind(&self) -> ElementKind {
        ElementKind::Database
    }

    fn classifier_path(&self) -> &str {
        DATABASE_CLASSIFIER_PATH
    }

    fn second_pass(&self, content: &Value, ctx: &mut LinkContext<'_>) -> Result<ElementBody> {
        let p: DatabaseProtocol = protocol::parse(ctx.element_path(), content)?;
        let includes = ctx.resolve_all("includes", &p.includes, &[ElementKind::Database]);
        check_unique(ctx, "schema", p.schemas.iter().map(|s| s.name.as_str()));

        let mut schemas = Vec::new();
        for schema in p.schemas {
            check_unique(ctx, "table", schema.tables.iter().map(|t| t.name.as_str()));
            let mut tables = Vec::new();
            for table in schema.tables {
                check_unique(ctx, "column", table.columns.iter().map(|c| c.name.as_str()));
                for key in &table.primary_key {
                    if !table.columns.iter().any(|c| &c.name == key) {
                        ctx.invalid(format!(
                            "primary key column '{}' missing from table '{}.{}'",
                            key, schema.name, table.name
                        ));
                    }
                }
                tables.push(Table {
                    name: table.name,
                    columns: table
                        .columns
                        .into_iter()
                        .map(|c| Column {
                            name: c.name,
                            data_type: c.data_type,
                            nullable: c.nullable,
                        })
                        .collect(),
                    primary_key: table.primary_key,
                });
            }
            schemas.push(Schema {
                name: schema.name,
                tables,
            });
        }

        Ok(ElementBody::Database(Database {
            includes,
            schemas,
            joins: p
                .joins
                .into_iter()
                .map(|j| Join {
                    name: j.name,
                    operation: j.operation,
                })
                .collect(),
            filters: p
                .filters
                .into_iter()
                .map(|f| Filter {
                    name: f.name,
                    operation: f.operation,
                })
                .collect(),
        }))
    }
}

pub struct FlatDataBuilder;

impl ElementBuilder for FlatDataBuilder {
    fn kind(&self) -> ElementKind {
        ElementKind::FlatData
    }

    fn classifier_path(&self) -> &str {
        FLAT_DATA_CLASSIFIER_PATH
    }

    fn second_pass(&self, content: &Value, ctx: &mut LinkContext<'_>) -> Result<ElementBody> {
        let p: FlatDataProtocol = protocol::parse(ctx.element_path(), content)?;
        let includes = ctx.resolve_all("includes", &p.includes, &[ElementKind::FlatData]);
        check_unique(ctx, "section", p.sections.iter().map(|s| s.name.as_str()));
        Ok(ElementBody::FlatData(FlatData {
            includes,
            sections: p
                .sections
                .into_iter()
                .map(|s| FlatDataSection {
                    name: s.name,
                    driver_id: s.driver_id,
                    fields: s
                        .fields
                        .into_iter()
                        .map(|f| FlatDataField {
                            label: f.label,
                            data_type: f.data_type,
                            optional: f.optional,
                        })
                        .collect(),
                })
                .collect(),
        }))
    }
}

pub struct DiagramBuilder;

impl ElementBuilder for DiagramBuilder {
    fn kind(&self) -> ElementKind {
        ElementKind::Diagram
    }

    fn classifier_path(&self) -> &str {
        DIAGRAM_CLASSIFIER_PATH
    }

    fn second_pass(&self, content: &Value, ctx: &mut LinkContext<'_>) -> Result<ElementBody> {
        let p: DiagramProtocol = protocol::parse(ctx.element_path(), content)?;
        check_unique(ctx, "class view", p.class_views.iter().map(|v| v.id.as_str()));
        let view_ids: HashSet<&str> = p.class_views.iter().map(|v| v.id.as_str()).collect();

        let mut class_views = Vec::new();
        for view in &p.class_views {
            if let Some(class) = ctx.resolve("classViews.class", &view.class, &[ElementKind::Class]) {
                class_views.push(ClassView {
                    id: view.id.clone(),
                    class,
                    position: Point {
                        x: view.position.x,
                        y: view.position.y,
                    },
                    rectangle: Rectangle {
                        width: view.rectangle.width,
                        height: view.rectangle.height,
                    },
                    hide_properties: view.hide_properties,
                    hide_stereotypes: view.hide_stereotypes,
                    hide_tagged_values: view.hide_tagged_values,
                });
            }
        }

        let mut property_views = Vec::new();
        for view in &p.property_views {
            check_view(ctx, &view_ids, &view.source_view);
            check_view(ctx, &view_ids, &view.target_view);
            let owning_class = ctx.resolve(
                "propertyViews.property.class",
                &view.property.class,
                &[ElementKind::Class],
            );
            if let Some(owning_class) = owning_class {
                property_views.push(PropertyView {
                    owning_class,
                    property: view.property.property.clone(),
                    source_view: view.source_view.clone(),
                    target_view: view.target_view.clone(),
                    path: points(&view.line.points),
                });
            }
        }

        let mut generalization_views = Vec::new();
        for view in &p.generalization_views {
            check_view(ctx, &view_ids, &view.source_view);
            check_view(ctx, &view_ids, &view.target_view);
            generalization_views.push(GeneralizationView {
                source_view: view.source_view.clone(),
                target_view: view.target_view.clone(),
                path: points(&view.line.points),
            });
        }

        Ok(ElementBody::Diagram(Diagram {
            class_views,
            property_views,
            generalization_views,
        }))
    }
}

pub struct GenerationSpecificationBuilder;

impl ElementBuilder for GenerationSpecificationBuilder {
    fn kind(&self) -> ElementKind {
        ElementKind::GenerationSpecification
    }

    fn classifier_path(&self) -> &str {
        GENERATION_SPECIFICATION_CLASSIFIER_PATH
    }

    fn second_pass(&self, content: &Value, ctx: &mut LinkContext<'_>) -> Result<ElementBody> {
        let p: GenerationSpecificationProtocol = protocol::parse(ctx.element_path(), content)?;
        let mut generation_nodes = Vec::new();
        for node in p.generation_nodes {
            if let Some(generation_element) =
                ctx.resolve("generationNodes", &node.generation_element, &[])
            {
                let id = node
                    .id
                    .unwrap_or_else(|| ctx.graph().path_of(generation_element.value()));
                generation_nodes.push(GenerationNode {
                    id,
                    generation_element,
                });
            }
        }
        check_unique(
            ctx,
            "generation node id",
            generation_nodes.iter().map(|n: &GenerationNode| n.id.as_str()),
        );
        Ok(ElementBody::GenerationSpecification(GenerationSpecification {
            generation_nodes,
        }))
    }
}

/// Section indices carry no references; they are complete after registration
/// so that section-aware resolution can read them during linking
pub struct SectionIndexBuilder;

impl SectionIndexBuilder {
    fn build(path: &str, content: &Value) -> Result<ElementBody> {
        let p: SectionIndexProtocol = protocol::parse(path, content)?;
        Ok(ElementBody::SectionIndex(SectionIndex {
            sections: p
                .sections
                .into_iter()
                .map(|s| Section {
                    parser_name: s.parser_name,
                    imports: s.imports,
                    elements: s.elements,
                })
                .collect(),
            is_deleted: false,
        }))
    }
}

impl ElementBuilder for SectionIndexBuilder {
    fn kind(&self) -> ElementKind {
        ElementKind::SectionIndex
    }

    fn classifier_path(&self) -> &str {
        SECTION_INDEX_CLASSIFIER_PATH
    }

    fn first_pass(&self, path: &str, content: &Value) -> Result<ElementBody> {
        Self::build(path, content)
    }

    fn second_pass(&self, content: &Value, ctx: &mut LinkContext<'_>) -> Result<ElementBody> {
        Self::build(ctx.element_path(), content)
    }
}
