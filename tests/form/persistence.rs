//! Save: validation gating, atomicity, hook faults

use crate::common::*;

#[test]
fn save_persists_every_bound_owner() {
    let mut fixture = OrderFixture::new(
        Record::new().with("price", 10),
        Record::new().with("amount", 10),
    );
    fixture.form.set("name", "Order").unwrap();

    assert!(fixture.form.save(SaveOptions::new()).unwrap());
    assert_eq!(fixture.store.len(), 2);
    assert_eq!(fixture.product.lock().persist_count(), 1);
    assert_eq!(fixture.billing.lock().persist_count(), 1);
    assert_eq!(fixture.product.lock().validation_count(), 1);
}

#[test]
fn failed_owner_rolls_back_successful_one() {
    let mut fixture = OrderFixture::new(
        Record::new().with("price", 10),
        Record::new().failing_persist(),
    );
    fixture.form.set("name", "Order").unwrap();

    assert!(!fixture.form.save(SaveOptions::new()).unwrap());
    assert!(fixture.store.is_empty());
    assert!(!fixture.store.in_transaction());
}

#[test]
fn rollback_restores_previous_state() {
    let mut fixture = OrderFixture::new(Record::new().with("price", 10), Record::new());
    fixture.form.set("name", "Order").unwrap();
    assert!(fixture.form.save(SaveOptions::new()).unwrap());
    let id = fixture.product.lock().id().map(str::to_string).unwrap();
    let before = fixture.store.get(&id).unwrap();

    fixture.form.set("price", 99).unwrap();
    let failing = shared(Record::new().failing_persist());
    fixture.form.bind("billing", failing).unwrap();

    assert!(!fixture.form.save(SaveOptions::new()).unwrap());
    assert_eq!(fixture.store.get(&id).unwrap(), before);
}

#[test]
fn validate_false_skips_validation_entirely() {
    let mut fixture = OrderFixture::new(Record::new().requires("price"), Record::new());

    // name is blank and product is invalid, but nothing checks
    assert!(fixture.form.save(SaveOptions::skip_validation()).unwrap());
    assert_eq!(fixture.product.lock().validation_count(), 0);
    assert_eq!(fixture.product.lock().persist_count(), 1);
    assert!(fixture.form.errors().is_empty());
}

#[test]
fn validate_option_on_form() {
    let store = std::sync::Arc::new(MemoryStore::new());
    let mut form = Form::builder(&ORDER_FORM)
        .options(attrs([("validate", Value::Bool(false))]))
        .unit_of_work(store.clone())
        .build()
        .unwrap();
    assert!(form.save(SaveOptions::new()).unwrap());
    assert!(!form.save(SaveOptions::validate(true)).unwrap());
}

#[test]
fn invalid_form_touches_nothing() {
    let mut fixture = OrderFixture::new(Record::new(), Record::new());
    assert!(!fixture.form.save(SaveOptions::new()).unwrap());
    assert_eq!(fixture.product.lock().persist_count(), 0);
    assert_eq!(fixture.billing.lock().persist_count(), 0);
}

#[test]
fn save_strict_raises_with_errors() {
    let mut fixture = OrderFixture::new(Record::new(), Record::new());
    let err = fixture.form.save_strict(SaveOptions::new()).unwrap_err();
    let errors = err.errors().unwrap();
    assert_eq!(errors.get("name"), ["can't be blank"]);
    assert_eq!(errors, fixture.form.errors());
}

#[test]
fn save_hook_fault_rolls_back() {
    let schema = FormSchema::builder("FaultyAfterSave")
        .extends(&ORDER_FORM)
        .after(Phase::Save, |_| Err(FormError::hook(Phase::Save, "audit log offline")))
        .build()
        .unwrap();
    let mut fixture = OrderFixture::with_schema(&schema, Record::new(), Record::new());
    fixture.form.set("name", "Order").unwrap();

    let err = fixture.form.save(SaveOptions::new()).unwrap_err();
    assert!(matches!(err, FormError::Hook { .. }));
    // owners ran, but their writes were rolled back
    assert_eq!(fixture.product.lock().persist_count(), 1);
    assert!(fixture.store.is_empty());
    assert!(!fixture.store.in_transaction());
}

#[test]
fn skipped_save_body_counts_as_failure() {
    let schema = FormSchema::builder("NeverSaves")
        .extends(&ORDER_FORM)
        .around(Phase::Save, |_, _| Ok(()))
        .build()
        .unwrap();
    let mut fixture = OrderFixture::with_schema(&schema, Record::new(), Record::new());
    fixture.form.set("name", "Order").unwrap();

    assert!(!fixture.form.save(SaveOptions::new()).unwrap());
    assert_eq!(fixture.product.lock().persist_count(), 0);
    assert!(!fixture.form.phase_report(Phase::Save).unwrap().body_ran);
}

#[test]
fn a_form_is_never_persisted_itself() {
    let mut fixture = OrderFixture::new(Record::new(), Record::new());
    fixture.form.set("name", "Order").unwrap();
    fixture.form.save(SaveOptions::new()).unwrap();
    assert!(!fixture.form.is_persisted());
}
