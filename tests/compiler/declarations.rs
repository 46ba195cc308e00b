//! Value types, forward references, objectification, constraint declarations

use cqlc_compiler::{
    Compiler, ConstraintDecl, Declaration, EntityTypeDecl, FactTypeDecl, ValueTypeDecl,
};
use cqlc_foundation::ErrorKind;
use cqlc_schema::{Frequency, ValueRange, ValueRestriction};

use crate::support::{clause, compiled, entity, fact, girl_and_boy, value};

// =============================================================================
// Value Types
// =============================================================================

#[test]
fn value_type_creates_its_base() {
    let schema = compiled(&[Declaration::ValueType(
        ValueTypeDecl::new("Name")
            .written_as("String")
            .with_size(Some(64), None),
    )])
    .into_schema();

    let string = schema.object_type_id("String").unwrap();
    let name = schema.object_type_by_name("Name").unwrap().as_value().unwrap();
    assert_eq!(name.base, Some(string));
    assert_eq!(name.length, Some(64));
}

#[test]
fn value_type_restriction_is_recorded() {
    let restriction = ValueRestriction::new(vec![
        ValueRange::Single("M".to_string()),
        ValueRange::Single("F".to_string()),
    ]);
    let schema = compiled(&[Declaration::ValueType(
        ValueTypeDecl::new("Gender").restricted_to(restriction.clone()),
    )])
    .into_schema();

    let gender = schema.object_type_by_name("Gender").unwrap().as_value().unwrap();
    assert_eq!(gender.restriction, Some(restriction));
}

#[test]
fn identical_redeclaration_is_a_no_op_and_different_one_conflicts() {
    let name = || Declaration::ValueType(ValueTypeDecl::new("Name").written_as("String"));
    let mut compiler = compiled(&[name(), name()]);
    assert_eq!(compiler.schema().object_type_count(), 2);

    let err = compiler
        .compile(&Declaration::ValueType(
            ValueTypeDecl::new("Name").written_as("String").with_size(Some(10), None),
        ))
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::ConflictingDeclaration(_)));
}

#[test]
fn entity_name_cannot_become_a_value_type() {
    let mut compiler = compiled(&[entity("Person")]);
    let err = compiler.compile(&value("Person")).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::TypeConflict { .. }));
}

// =============================================================================
// Forward References
// =============================================================================

#[test]
fn forward_reference_resolves_as_value_type_in_place() {
    let mut compiler = compiled(&[
        entity("Person"),
        fact(&["Person was born in one [Year]"]),
    ]);
    let year = compiler.schema().object_type_by_name("Year").unwrap();
    assert!(year.is_provisional());
    let year_id = year.id;
    assert!(compiler.finish().is_err());

    compiler.compile(&value("Year")).unwrap();

    let year = compiler.schema().object_type_by_name("Year").unwrap();
    assert_eq!(year.id, year_id);
    assert!(year.is_value_type());
    assert_eq!(compiler.schema().role_count(year_id), 1);
    compiler.finish().unwrap();
}

#[test]
fn forward_reference_resolves_as_entity_type() {
    let mut compiler = compiled(&[
        entity("Person"),
        fact(&["Person works for [Company]"]),
        Declaration::EntityType(EntityTypeDecl::new("Company").identified_by_mode("Name")),
    ]);
    compiler.finish().unwrap();

    let company = compiler.schema().object_type_by_name("Company").unwrap();
    assert!(!company.is_provisional());
    assert!(compiler.schema().preferred_identifier(company.id).is_ok());
}

#[test]
fn unresolved_forward_references_are_listed() {
    let compiler = compiled(&[
        entity("Person"),
        fact(&["Person works for [Company]"]),
        fact(&["Person lives in [City]"]),
    ]);
    let err = compiler.finish().unwrap_err();
    assert!(matches!(
        err.kind,
        ErrorKind::UnresolvedForwardReference(ref names) if names == &["City", "Company"]
    ));
}

#[test]
fn unknown_supertype_is_a_forward_reference() {
    let mut compiler = compiled(&[Declaration::EntityType(
        EntityTypeDecl::new("Employee").subtype_of("Person"),
    )]);
    assert!(compiler.finish().is_err());

    compiler
        .compile(&Declaration::EntityType(
            EntityTypeDecl::new("Person").identified_by_mode("Id"),
        ))
        .unwrap();
    compiler.finish().unwrap();

    let employee = compiler.schema().object_type_id("Employee").unwrap();
    assert!(compiler.schema().preferred_identifier(employee).is_ok());
}

// =============================================================================
// Subtypes
// =============================================================================

#[test]
fn circular_supertypes_are_rejected() {
    let mut compiler = compiled(&[
        entity("Person"),
        Declaration::EntityType(EntityTypeDecl::new("Employee").subtype_of("Person")),
    ]);
    let err = compiler
        .compile(&Declaration::EntityType(
            EntityTypeDecl::new("Person").subtype_of("Employee"),
        ))
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::CircularSupertype { .. }));
}

#[test]
fn value_type_cannot_be_a_supertype() {
    let mut compiler = compiled(&[value("Name")]);
    let err = compiler
        .compile(&Declaration::EntityType(
            EntityTypeDecl::new("Nickname").subtype_of("Name"),
        ))
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::TypeConflict { .. }));
    assert!(compiler.schema().object_type_by_name("Nickname").is_none());
}

// =============================================================================
// Objectification
// =============================================================================

#[test]
fn named_fact_type_is_objectified() {
    let mut declarations = girl_and_boy();
    declarations.push(Declaration::FactType(FactTypeDecl::objectified(
        "Dating",
        vec![clause("Girl is going out with at most one Boy")],
    )));
    let schema = compiled(&declarations).into_schema();

    let dating = schema.object_type_by_name("Dating").unwrap();
    let ft = dating.as_entity().unwrap().objectified.unwrap();
    assert_eq!(schema.fact_type(ft).objectified_by, Some(dating.id));
}

#[test]
fn objectifying_entity_can_play_roles() {
    let mut declarations = girl_and_boy();
    declarations.push(Declaration::FactType(FactTypeDecl::objectified(
        "Dating",
        vec![clause("Girl is going out with Boy")],
    )));
    declarations.push(value("Date"));
    declarations.push(fact(&["Dating started on one Date"]));
    let schema = compiled(&declarations).into_schema();

    assert_eq!(schema.fact_types_by_player_set(&["Date", "Dating"]).len(), 1);
}

#[test]
fn value_type_cannot_objectify() {
    let mut declarations = girl_and_boy();
    declarations.push(value("Dating"));
    let mut compiler = compiled(&declarations);

    let err = compiler
        .compile(&Declaration::FactType(FactTypeDecl::objectified(
            "Dating",
            vec![clause("Girl is going out with Boy")],
        )))
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::TypeConflict { .. }));
    assert_eq!(compiler.schema().fact_type_count(), 0);
}

// =============================================================================
// Constraint Declarations
// =============================================================================

fn each(role: &str, quantifier: Frequency, reading: &str) -> Declaration {
    Declaration::Constraint(ConstraintDecl::Presence {
        name: None,
        quantifier,
        roles: vec![clause(role)],
        clauses: vec![clause(reading)],
    })
}

#[test]
fn constraint_declaration_matches_an_existing_reading() {
    let mut declarations = girl_and_boy();
    declarations.push(fact(&["Girl is going out with Boy"]));
    declarations.push(each("Girl", Frequency::at_most_one(), "Girl is going out with Boy"));
    let schema = compiled(&declarations).into_schema();

    assert_eq!(schema.presence_constraint_count(), 1);
    let pc = schema.presence_constraints().next().unwrap();
    let roles = schema.constrained_roles(pc.id);
    assert_eq!(schema.name_of(schema.role(roles[0]).player), "Girl");
}

#[test]
fn constraint_declaration_agrees_with_embedded_quantifier() {
    let mut declarations = girl_and_boy();
    declarations.push(fact(&["Girl is going out with at most one Boy"]));
    declarations.push(each("Girl", Frequency::at_most_one(), "Girl is going out with Boy"));
    let mut compiler = compiled(&declarations);
    assert_eq!(compiler.schema().presence_constraint_count(), 1);

    let err = compiler
        .compile(&each(
            "Girl",
            Frequency::new(None, Some(2)),
            "Girl is going out with Boy",
        ))
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::ConflictingFrequency { .. }));
}

#[test]
fn constraint_over_an_unknown_reading_fails() {
    let mut compiler = compiled(&girl_and_boy());
    let err = compiler
        .compile(&each("Girl", Frequency::at_most_one(), "Girl admires Boy"))
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::NoMatchingFactType(_)));
}

#[test]
fn mandatory_constraint_declaration() {
    let mut declarations = girl_and_boy();
    declarations.push(fact(&["Girl is going out with Boy"]));
    declarations.push(each(
        "Boy",
        Frequency::new(Some(1), None),
        "Girl is going out with Boy",
    ));
    let schema = compiled(&declarations).into_schema();

    let pc = schema.presence_constraints().next().unwrap();
    assert!(pc.is_mandatory);
    assert_eq!(pc.max_frequency, None);
}

#[test]
fn compiler_round_trip_through_an_existing_schema() {
    let mut declarations = girl_and_boy();
    declarations.push(fact(&["Girl is going out with Boy"]));
    let schema = compiled(&declarations).into_schema();

    let mut compiler = Compiler::from(schema);
    compiler.compile(&fact(&["Girl is going out with Boy"])).unwrap();
    assert_eq!(compiler.schema().fact_type_count(), 1);
}
