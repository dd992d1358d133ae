//! Phase hooks: ordering, skipping, faults, inheritance

use crate::common::*;
use std::sync::Arc;

fn traced(trail: &Trail, phase: Phase) -> Arc<FormSchema> {
    let (b, a, r) = (trail.clone(), trail.clone(), trail.clone());
    let id = phase.id();
    FormSchema::builder("Traced")
        .extends(&ORDER_FORM)
        .before(phase, move |_| {
            b.push(format!("before_{}", id));
            Ok(())
        })
        .around(phase, move |form, proceed| {
            r.push(format!("around_{}_in", id));
            proceed.run(form)?;
            r.push(format!("around_{}_out", id));
            Ok(())
        })
        .after(phase, move |_| {
            a.push(format!("after_{}", id));
            Ok(())
        })
        .build()
        .unwrap()
}



#[test]
fn initialize_hooks_wrap_construction() {
    let trail = Trail::new();
    let schema = traced(&trail, Phase::Initialize);
    let init_trail = trail.clone();
    Form::builder(&schema)
        .init(move |_| {
            init_trail.push("init");
            Ok(())
        })
        .build()
        .unwrap();

    assert_eq!(
        trail.entries(),
        [
            "before_initialize",
            "around_initialize_in",
            "init",
            "around_initialize_out",
            "after_initialize"
        ]
    );
}

#[test]
fn validation_hooks_run_once_per_check() {
    let trail = Trail::new();
    let schema = traced(&trail, Phase::Validation);
    let mut form = Form::new(&schema, Attributes::new()).unwrap();

    form.is_valid().unwrap();
    assert_eq!(trail.count("before_validation"), 1);
    assert_eq!(trail.count("around_validation_in"), 1);
    assert_eq!(trail.count("after_validation"), 1);
}

#[test]
fn after_validation_runs_when_invalid() {
    let trail = Trail::new();
    let schema = traced(&trail, Phase::Validation);
    let mut form = Form::new(&schema, Attributes::new()).unwrap();

    assert!(!form.is_valid().unwrap());
    assert_eq!(trail.count("after_validation"), 1);
}

#[test]
fn save_hooks_run_once_and_skip_validation_when_asked() {
    let trail = Trail::new();
    let validation = traced(&trail, Phase::Validation);
    let schema = FormSchema::builder("TracedSave")
        .extends(&validation)
        .before(Phase::Save, {
            let trail = trail.clone();
            move |_| {
                trail.push("before_save");
                Ok(())
            }
        })
        .build()
        .unwrap();
    let mut form = Form::new(&schema, attrs([("name", Value::from("Order"))])).unwrap();

    assert!(form.save(SaveOptions::new()).unwrap());
    assert_eq!(trail.count("before_validation"), 1);
    assert_eq!(trail.count("before_save"), 1);

    assert!(form.save(SaveOptions::skip_validation()).unwrap());
    assert_eq!(trail.count("before_validation"), 1);
    assert_eq!(trail.count("before_save"), 2);
}

#[test]
fn around_without_proceed_skips_body() {
    let schema = FormSchema::builder("Skipping")
        .extends(&ORDER_FORM)
        .around(Phase::Validation, |_, _| Ok(()))
        .build()
        .unwrap();
    let mut fixture = OrderFixture::with_schema(&schema, Record::new().requires("price"), Record::new());

    // nothing ran, so nothing was reported
    assert!(fixture.form.is_valid().unwrap());
    assert_eq!(fixture.product.lock().validation_count(), 0);
    let report = fixture.form.phase_report(Phase::Validation).unwrap();
    assert_eq!(report.state, PhaseState::Done);
    assert!(!report.body_ran);
}

#[test]
fn initialize_fault_fails_construction() {
    let schema = FormSchema::builder("Refusing")
        .before(Phase::Initialize, |_| {
            Err(FormError::hook(Phase::Initialize, "not today"))
        })
        .build()
        .unwrap();
    let err = Form::new(&schema, Attributes::new()).unwrap_err();
    assert_eq!(err.to_string(), FormError::hook(Phase::Initialize, "not today").to_string());
}

#[test]
fn hooks_may_add_errors() {
    let schema = FormSchema::builder("HookErrors")
        .extends(&ORDER_FORM)
        .after(Phase::Validation, |form| {
            if form.errors().contains("name") {
                form.errors_mut().add_to_base("Order needs a name");
            }
            Ok(())
        })
        .build()
        .unwrap();
    let mut form = Form::new(&schema, Attributes::new()).unwrap();

    assert!(!form.is_valid().unwrap());
    assert_eq!(form.errors().get(Errors::BASE), ["Order needs a name"]);
}

#[test]
fn parent_hooks_run_before_child_hooks() {
    let trail = Trail::new();
    let (p, c) = (trail.clone(), trail.clone());
    let parent = FormSchema::builder("Parent")
        .after(Phase::Initialize, move |_| {
            p.push("parent");
            Ok(())
        })
        .build()
        .unwrap();
    let child = FormSchema::builder("Child")
        .extends(&parent)
        .after(Phase::Initialize, move |_| {
            c.push("child");
            Ok(())
        })
        .build()
        .unwrap();

    Form::new(&child, Attributes::new()).unwrap();
    assert_eq!(trail.entries(), ["parent", "child"]);
}
