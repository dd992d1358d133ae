//! Attribute routing, trust levels, and field access

use crate::common::*;

fn bound_product_form(params: Input) -> (Form, std::sync::Arc<parking_lot::Mutex<Record>>) {
    let owner = shared(Record::new().with("name", "Original"));
    let handle = owner.clone();
    let form = Form::builder(&PRODUCT_FORM)
        .params(params)
        .init(move |form| {
            form.bind("owner", handle)?;
            form.bind("test", shared(Record::new()))
        })
        .build()
        .unwrap();
    (form, owner)
}

#[test]
fn trusted_round_trip() {
    let params = attrs([
        ("self_foo", Value::from("foo")),
        ("self_boo", Value::from("boo")),
        ("price", Value::Int(12)),
        ("name", Value::from("Widget")),
        ("sku", Value::from("W-1")),
    ]);
    let (form, owner) = bound_product_form(Input::Trusted(params.clone()));

    assert_eq!(form.attributes(), &params);
    for (field, value) in &params {
        assert_eq!(&form.get(field).unwrap(), value);
    }
    assert_eq!(owner.lock().get("name"), Value::from("Widget"));
}

#[test]
fn untrusted_input_respects_writable_flag() {
    let (form, owner) = bound_product_form(Input::untrusted([
        ("price", Value::Int(99)),
        ("name", Value::from("Hacked")),
        ("self_boo", Value::from("direct")),
    ]));

    let owner = owner.lock();
    assert_eq!(owner.get("price"), Value::Int(99));
    assert_eq!(owner.get("name"), Value::from("Original"));
    // self fields are assigned directly
    assert_eq!(form.get("self_boo").unwrap(), Value::from("direct"));
    assert!(form.params().is_filterable());
}

#[test]
fn permit_produces_filtered_input_of_same_kind() {
    let params: formwork::UntrustedParams = [("price", Value::Int(1)), ("name", Value::from("x"))]
        .into_iter()
        .collect();
    let permitted = params.permit(&["price"]);
    assert_eq!(permitted.len(), 1);
    assert_eq!(params.len(), 2);
}

#[test]
fn unknown_fields_are_ignored() {
    let (form, owner) = bound_product_form(Input::trusted([
        ("price", Value::Int(5)),
        ("nonsense", Value::Bool(true)),
    ]));
    assert!(!owner.lock().attributes().contains_key("nonsense"));
    // still visible in the raw params
    assert!(form.attributes().contains_key("nonsense"));
}

#[test]
fn resetting_attributes_replaces_params() {
    let (mut form, owner) = bound_product_form(Input::trusted([("price", Value::Int(5))]));
    form.set_attributes(Input::trusted([("sku", Value::from("S"))]))
        .unwrap();

    assert_eq!(form.attributes().len(), 1);
    assert!(form.attributes().contains_key("sku"));
    // earlier writes stay on the owner
    assert_eq!(owner.lock().get("price"), Value::Int(5));
}

#[test]
fn direct_writes_bypass_filtering() {
    let (mut form, owner) = bound_product_form(Input::default());
    form.set("name", "Direct").unwrap();
    assert_eq!(owner.lock().get("name"), Value::from("Direct"));
}

#[test]
fn unbound_owner_routes_nowhere() {
    let mut form = Form::new(&ORDER_FORM, Attributes::new()).unwrap();
    form.set_attributes(Input::trusted([("amount", Value::Int(10))]))
        .unwrap();
    assert!(matches!(
        form.get("amount"),
        Err(FormError::UnboundOwner { .. })
    ));
}
