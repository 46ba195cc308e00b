//! End-to-end scenarios: readings, adjectives and quantifiers

use cqlc_foundation::Adjective;
use cqlc_schema::Schema;

use crate::support::{compiled, entity, entity_with_mode, fact, girl_and_boy};

fn with_girl_and_boy(mut declarations: Vec<cqlc_compiler::Declaration>) -> Schema {
    let mut all = girl_and_boy();
    all.append(&mut declarations);
    compiled(&all).into_schema()
}

fn role_player<'a>(schema: &'a Schema, role: cqlc_foundation::RoleId) -> &'a str {
    schema.name_of(schema.role(role).player)
}

// =============================================================================
// Girl and Boy
// =============================================================================

#[test]
fn second_direction_adds_reading_and_constraint() {
    let schema = with_girl_and_boy(vec![
        fact(&["Girl is going out with at most one Boy"]),
        fact(&[
            "Girl is going out with Boy",
            "Boy is going out with at most one Girl",
        ]),
    ]);

    let fact_types = schema.fact_types_by_player_set(&["Boy", "Girl"]);
    assert_eq!(fact_types.len(), 1);
    let ft = fact_types[0];
    assert_eq!(schema.readings(ft).len(), 2);
    assert_eq!(schema.presence_constraint_count(), 2);

    // One uniqueness constraint per direction.
    let constrained: Vec<&str> = schema
        .presence_constraints()
        .map(|pc| {
            let roles = schema.constrained_roles(pc.id);
            assert_eq!(roles.len(), 1);
            assert!(pc.is_unique());
            role_player(&schema, roles[0])
        })
        .collect();
    assert_eq!(constrained, ["Girl", "Boy"]);

    let texts: Vec<String> = schema
        .readings(ft)
        .iter()
        .map(|r| schema.expand_reading(r.id))
        .collect();
    assert_eq!(
        texts,
        ["Girl is going out with Boy", "Boy is going out with Girl"]
    );
}

#[test]
fn absorbed_leading_adjective_leaves_only_the_trailing_one() {
    let schema = with_girl_and_boy(vec![
        fact(&["Girl is going out with at most one ugly-Boy"]),
        fact(&[
            "Girl is going out with ugly Boy-monster",
            "Boy monster is going out with Girl",
        ]),
    ]);

    assert_eq!(schema.fact_type_count(), 1);
    let ft = schema.fact_types_by_player_set(&["Boy", "Girl"])[0];
    let readings = schema.readings(ft);
    assert_eq!(readings.len(), 2);

    let new_reading = readings[1];
    let refs = &schema.role_sequence(new_reading.role_sequence).refs;
    let boy_ref = refs
        .iter()
        .find(|r| role_player(&schema, r.role) == "Boy")
        .unwrap();
    assert!(boy_ref.leading.is_empty());
    assert_eq!(boy_ref.trailing, Adjective::parse("monster"));
    assert_eq!(
        schema.expand_reading(new_reading.id),
        "Boy-monster is going out with Girl"
    );

    // The role itself keeps the adjective it was created with.
    assert_eq!(schema.role(boy_ref.role).leading, Adjective::parse("ugly"));
}

#[test]
fn hyphen_in_one_clause_is_recognized_in_another() {
    let schema = with_girl_and_boy(vec![fact(&[
        "Girl is going out with Boy-monster",
        "Boy monster is going out with at most one Girl",
    ])]);

    let ft = schema.fact_types_by_player_set(&["Boy", "Girl"])[0];
    assert_eq!(schema.readings(ft).len(), 2);
    let roles = &schema.fact_type(ft).roles;
    assert_eq!(schema.role(roles[1]).trailing, Adjective::parse("monster"));
}

#[test]
fn different_wording_makes_a_new_fact_type() {
    let schema = with_girl_and_boy(vec![
        fact(&["Girl is going out with Boy"]),
        fact(&["Girl is friends with Boy"]),
    ]);
    assert_eq!(schema.fact_types_by_player_set(&["Boy", "Girl"]).len(), 2);
}

#[test]
fn unary_fact_type_quantifier_constrains_its_own_role() {
    let schema = compiled(&[entity("Person"), fact(&["one Person smokes"])]).into_schema();

    let ft = schema.fact_types_by_player_set(&["Person"])[0];
    assert_eq!(schema.fact_type(ft).arity(), 1);
    let pc = schema.presence_constraints().next().unwrap();
    assert_eq!(schema.constrained_roles(pc.id), schema.fact_type(ft).roles);
}

// =============================================================================
// Role Names
// =============================================================================

#[test]
fn role_names_distinguish_roles_of_the_same_player() {
    let schema = compiled(&[
        entity("Person"),
        fact(&[
            "Person (as Father) is father of Person (as Child)",
            "Child is child of one Father",
        ]),
    ])
    .into_schema();

    let ft = schema.fact_types_by_player_set(&["Person", "Person"])[0];
    let readings = schema.readings(ft);
    assert_eq!(readings.len(), 2);
    assert_eq!(
        schema.expand_reading(readings[1].id),
        "Person (as Child) is child of Person (as Father)"
    );

    let father = schema.fact_type(ft).roles[0];
    assert_eq!(schema.role(father).role_name.as_deref(), Some("Father"));
    let pc = schema.presence_constraints().next().unwrap();
    assert_eq!(pc.min_frequency, Some(1));
    assert_eq!(schema.constrained_roles(pc.id).len(), 1);
    assert_ne!(schema.constrained_roles(pc.id)[0], father);
}

// =============================================================================
// Subtypes
// =============================================================================

#[test]
fn multiple_inheritance_is_transitive_without_duplicates() {
    use cqlc_compiler::{Declaration, EntityTypeDecl};

    let schema = compiled(&[
        entity_with_mode("Person", "Id"),
        entity("Australian"),
        Declaration::EntityType(EntityTypeDecl::new("Employee").subtype_of("Person")),
        Declaration::EntityType(
            EntityTypeDecl::new("AustralianEmployee")
                .subtype_of("Employee")
                .subtype_of("Australian"),
        ),
    ])
    .into_schema();

    let ae = schema.object_type_id("AustralianEmployee").unwrap();
    let inheritance: Vec<_> = schema
        .fact_types()
        .filter(|ft| ft.inheritance.is_some_and(|i| i.subtype == ae))
        .collect();
    assert_eq!(inheritance.len(), 2);

    let chain: Vec<&str> = schema
        .supertypes_transitive(ae)
        .into_iter()
        .map(|t| schema.name_of(t))
        .collect();
    assert_eq!(chain, ["AustralianEmployee", "Employee", "Australian", "Person"]);

    let employee = schema.object_type_id("Employee").unwrap();
    let data = schema.object_type(ae).as_entity().unwrap();
    assert_eq!(data.identifying_supertype, Some(employee));
    let pc = schema.preferred_identifier(ae).unwrap();
    assert!(pc.is_preferred_identifier);
}
