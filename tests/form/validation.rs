//! Validation aggregation through the public form API

use crate::common::*;
use std::sync::Arc;

#[test]
fn presence_on_self_field() {
    let mut form = Form::new(&ORDER_FORM, Attributes::new()).unwrap();
    assert!(!form.is_valid().unwrap());
    assert_eq!(form.errors().get("name"), ["can't be blank"]);
}

#[test]
fn unbound_billing_does_not_fault() {
    let mut form = Form::new(&ORDER_FORM, attrs([("name", Value::from("Order"))])).unwrap();
    assert!(form.owner("billing").is_none());
    assert!(form.is_valid().unwrap());
}

#[test]
fn owner_field_errors_fold_onto_form() {
    let mut fixture = OrderFixture::new(
        Record::new().numeric("price").requires("internal_code"),
        Record::new(),
    );
    fixture.form.set("name", "Order").unwrap();

    assert!(!fixture.form.is_valid().unwrap());
    assert_eq!(fixture.form.errors().get("price"), ["is not a number"]);
    assert!(!fixture.form.errors().contains("internal_code"));
    assert_eq!(
        fixture.form.errors().full_messages(),
        ["Price is not a number"]
    );
}

#[test]
fn is_valid_is_idempotent() {
    let mut fixture = OrderFixture::new(Record::new().requires("price"), Record::new());

    let first = fixture.form.is_valid().unwrap();
    let first_errors = fixture.form.errors().clone();
    let second = fixture.form.is_valid().unwrap();

    assert_eq!(first, second);
    assert_eq!(&first_errors, fixture.form.errors());
    assert_eq!(fixture.product.lock().validation_count(), 2);
}

#[test]
fn rules_run_once_per_check() {
    let counter = Counter::new();
    let seen = counter.clone();
    let schema = FormSchema::builder("Counted")
        .extends(&ORDER_FORM)
        .validate(move |_, _| seen.bump())
        .build()
        .unwrap();
    let mut fixture = OrderFixture::with_schema(&schema, Record::new(), Record::new());

    fixture.form.is_valid().unwrap();
    assert_eq!(counter.get(), 1);
    assert_eq!(fixture.product.lock().validation_count(), 1);
    assert_eq!(fixture.billing.lock().validation_count(), 1);
}

#[test]
fn require_owner_valid_summarizes_owner() {
    let schema = FormSchema::builder("StrictOrder")
        .extends(&ORDER_FORM)
        .require_owner_valid("billing")
        .build()
        .unwrap();
    let mut fixture = OrderFixture::with_schema(
        &schema,
        Record::new(),
        Record::new().requires("amount").requires("card"),
    );
    fixture.form.set("name", "Order").unwrap();

    assert!(!fixture.form.is_valid().unwrap());
    let errors = fixture.form.errors();
    assert_eq!(errors.get("amount"), ["can't be blank"]);
    assert_eq!(
        errors.get("billing"),
        ["is invalid due to amount: can't be blank; card: can't be blank"]
    );
}

#[test]
fn owner_only_mode_reports_owner_key_alone() {
    let config = FormConfig {
        owner_errors: OwnerErrorMode::OwnerOnly,
        ..FormConfig::default()
    };
    let schema = FormSchema::builder("OwnerOnlyOrder")
        .extends(&order_form(&config))
        .require_owner_valid("billing")
        .build()
        .unwrap();
    let mut fixture =
        OrderFixture::with_schema(&schema, Record::new(), Record::new().requires("amount"));
    fixture.form.set("name", "Order").unwrap();

    assert!(!fixture.form.is_valid().unwrap());
    assert!(!fixture.form.errors().contains("amount"));
    assert_eq!(fixture.form.errors().get("billing").len(), 1);
}

#[test]
fn conditional_owner_rule_uses_form_state() {
    let schema: Arc<FormSchema> = FormSchema::builder("Conditional")
        .extends(&ORDER_FORM)
        .field("strict", FieldOptions::owner("self"))
        .require_owner_valid_if("product", |form| {
            form.get("strict").map_or(false, |v| v.as_bool() == Some(true))
        })
        .build()
        .unwrap();
    let mut fixture =
        OrderFixture::with_schema(&schema, Record::new().requires("sku"), Record::new());
    fixture.form.set("name", "Order").unwrap();

    assert!(fixture.form.is_valid().unwrap());

    fixture.form.set("strict", true).unwrap();
    assert!(!fixture.form.is_valid().unwrap());
    assert!(fixture.form.errors().contains("product"));
}
