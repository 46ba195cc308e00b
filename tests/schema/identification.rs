//! Integration tests for preferred identifier resolution

use cqlc_foundation::ErrorKind;
use cqlc_schema::{
    ConstraintDefinition, EntityType, Frequency, RoleDefinition, Schema, TypeInheritance,
    ValueType,
};

#[test]
fn own_identifier_wins() {
    let mut schema = Schema::new();
    let person = schema.add_entity_type("Person", EntityType::default());
    let id = schema.add_value_type("Person Id", ValueType::default());
    let ft = schema.add_fact_type(
        vec![RoleDefinition::played_by(person), RoleDefinition::played_by(id)],
        None,
    );
    let value_role = schema.fact_type(ft).roles[1];
    let pc = schema.add_presence_constraint(
        ConstraintDefinition::over(vec![value_role])
            .with_frequency(Frequency::at_most_one())
            .preferred_identifier(true),
    );
    schema.entity_type_mut(person).unwrap().preferred_identifier = Some(pc);

    assert_eq!(schema.preferred_identifier(person).unwrap().id, pc);
}

#[test]
fn subtype_is_identified_through_supertype_link() {
    let mut schema = Schema::new();
    let person = schema.add_entity_type("Person", EntityType::default());
    let employee = schema.add_entity_type("Employee", EntityType::default());
    let link = schema.add_fact_type(
        vec![
            RoleDefinition::played_by(employee),
            RoleDefinition::played_by(person),
        ],
        Some(TypeInheritance {
            subtype: employee,
            supertype: person,
            provides_identification: true,
        }),
    );
    let super_role = schema.fact_type(link).roles[1];
    let pc = schema.add_presence_constraint(
        ConstraintDefinition::over(vec![super_role])
            .with_frequency(Frequency::at_most_one())
            .preferred_identifier(true),
    );
    {
        let data = schema.entity_type_mut(employee).unwrap();
        data.supertypes.push(person);
        data.identifying_supertype = Some(person);
    }

    assert_eq!(schema.preferred_identifier(employee).unwrap().id, pc);
}

#[test]
fn objectification_is_identified_by_its_uniqueness() {
    let mut schema = Schema::new();
    let girl = schema.add_entity_type("Girl", EntityType::default());
    let boy = schema.add_entity_type("Boy", EntityType::default());
    let ft = schema.add_fact_type(
        vec![RoleDefinition::played_by(girl), RoleDefinition::played_by(boy)],
        None,
    );
    let roles = schema.fact_type(ft).roles.clone();
    let pc = schema.add_presence_constraint(
        ConstraintDefinition::over(roles).with_frequency(Frequency::at_most_one()),
    );
    let dating = schema.add_entity_type(
        "Dating",
        EntityType {
            objectified: Some(ft),
            ..EntityType::default()
        },
    );
    schema.set_objectified_by(ft, dating);

    assert_eq!(schema.preferred_identifier(dating).unwrap().id, pc);
    assert_eq!(schema.fact_type(ft).objectified_by, Some(dating));
}

#[test]
fn unidentified_entity_has_no_identifier() {
    let mut schema = Schema::new();
    let thing = schema.add_entity_type("Thing", EntityType::default());
    let err = schema.preferred_identifier(thing).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::NoIdentifier(ref name) if name == "Thing"));
}
