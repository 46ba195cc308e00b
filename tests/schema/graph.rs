//! Integration tests for object types, fact types and roles

use cqlc_foundation::Adjective;
use cqlc_schema::{
    EntityType, ObjectKind, RoleDefinition, Schema, TypeInheritance, ValueType,
};

fn person_schema() -> Schema {
    let mut schema = Schema::new();
    let text = schema.add_value_type("Text", ValueType::default());
    schema.add_value_type(
        "Name",
        ValueType {
            base: Some(text),
            length: Some(64),
            ..ValueType::default()
        },
    );
    schema.add_entity_type("Person", EntityType::default());
    schema
}

// =============================================================================
// Object Types
// =============================================================================

#[test]
fn names_are_unique_handles() {
    let schema = person_schema();
    let name = schema.object_type_by_name("Name").unwrap();

    assert_eq!(schema.object_type(name.id).name, "Name");
    assert_eq!(schema.name_of(name.id), "Name");
    assert!(name.is_value_type());
    assert_eq!(name.as_value().unwrap().length, Some(64));
}

#[test]
fn object_types_iterate_in_creation_order() {
    let schema = person_schema();
    let ordered: Vec<_> = schema.object_types().map(|ot| ot.name.as_str()).collect();
    assert_eq!(ordered, ["Text", "Name", "Person"]);
    for name in ordered {
        assert_eq!(schema.object_type_by_name(name).unwrap().name, name);
    }
}

#[test]
fn provisional_entity_is_reported_until_replaced() {
    let mut schema = person_schema();
    let company = schema.add_entity_type("Company", EntityType::provisional());

    let pending: Vec<_> = schema.provisional_object_types().map(|ot| ot.id).collect();
    assert_eq!(pending, [company]);
    assert_eq!(schema.object_type(company).describe_kind(), "a forward reference");

    schema.replace_kind(company, ObjectKind::Entity(EntityType::default()));
    assert_eq!(schema.provisional_object_types().count(), 0);
    assert_eq!(schema.object_type(company).describe_kind(), "an entity type");
}

// =============================================================================
// Fact Types and Roles
// =============================================================================

#[test]
fn roles_are_allocated_in_order() {
    let mut schema = person_schema();
    let person = schema.object_type_id("Person").unwrap();
    let name = schema.object_type_id("Name").unwrap();

    let ft = schema.add_fact_type(
        vec![
            RoleDefinition::played_by(person),
            RoleDefinition::played_by(name).with_leading(Adjective::parse("family")),
        ],
        None,
    );

    let fact_type = schema.fact_type(ft);
    assert_eq!(fact_type.arity(), 2);
    let second = schema.role(fact_type.roles[1]);
    assert_eq!(second.ordinal, 1);
    assert_eq!(second.player, name);
    assert_eq!(second.fact_type, ft);
    assert_eq!(second.leading, Adjective::parse("family"));
    assert_eq!(schema.roles_played_by(person), vec![fact_type.roles[0]]);
}

#[test]
fn player_set_lookup_handles_ring_fact_types() {
    let mut schema = person_schema();
    let person = schema.object_type_id("Person").unwrap();
    let ring = schema.add_fact_type(
        vec![RoleDefinition::played_by(person), RoleDefinition::played_by(person)],
        None,
    );
    let unary = schema.add_fact_type(vec![RoleDefinition::played_by(person)], None);

    assert_eq!(schema.fact_types_with_players(&[person, person]), vec![ring]);
    assert_eq!(schema.fact_types_with_players(&[person]), vec![unary]);
    assert_eq!(schema.player_multiset(ring), vec![person, person]);
}

// =============================================================================
// Supertypes
// =============================================================================

fn link(schema: &mut Schema, subtype: &str, supertype: &str) {
    let sub = schema.object_type_id(subtype).unwrap();
    let sup = schema.object_type_id(supertype).unwrap();
    schema.add_fact_type(
        vec![RoleDefinition::played_by(sub), RoleDefinition::played_by(sup)],
        Some(TypeInheritance {
            subtype: sub,
            supertype: sup,
            provides_identification: true,
        }),
    );
    schema.entity_type_mut(sub).unwrap().supertypes.push(sup);
}

#[test]
fn supertypes_transitive_is_breadth_first_without_duplicates() {
    let mut schema = person_schema();
    for name in ["Employee", "Australian", "AustralianEmployee"] {
        schema.add_entity_type(name, EntityType::default());
    }
    link(&mut schema, "Employee", "Person");
    link(&mut schema, "Australian", "Person");
    link(&mut schema, "AustralianEmployee", "Employee");
    link(&mut schema, "AustralianEmployee", "Australian");

    let id = schema.object_type_id("AustralianEmployee").unwrap();
    let names: Vec<_> = schema
        .supertypes_transitive(id)
        .into_iter()
        .map(|t| schema.name_of(t).to_string())
        .collect();

    assert_eq!(names, ["AustralianEmployee", "Employee", "Australian", "Person"]);
}

#[test]
fn type_inheritance_is_directional() {
    let mut schema = person_schema();
    schema.add_entity_type("Employee", EntityType::default());
    link(&mut schema, "Employee", "Person");

    let employee = schema.object_type_id("Employee").unwrap();
    let person = schema.object_type_id("Person").unwrap();
    assert!(schema.type_inheritance(employee, person).is_some());
    assert!(schema.type_inheritance(person, employee).is_none());
}

#[test]
fn value_types_chain_through_bases() {
    let schema = person_schema();
    let name = schema.object_type_id("Name").unwrap();
    let text = schema.object_type_id("Text").unwrap();
    assert_eq!(schema.supertypes_transitive(name), vec![name, text]);
}
