//! Registry resolution across schema inheritance

use crate::common::*;
use proptest::prelude::*;

#[test]
fn self_slot_comes_first() {
    let keys: Vec<&str> = PRODUCT_FORM
        .resolve_owners()
        .iter()
        .map(|slot| slot.key().as_str())
        .collect();
    assert_eq!(keys, ["self", "test", "owner"]);
}

#[test]
fn child_inherits_and_overrides() {
    let child = FormSchema::builder("SpecialProductForm")
        .extends(&PRODUCT_FORM)
        .field("name", FieldOptions::owner("owner").writable())
        .field("color", FieldOptions::owner("paint"))
        .build()
        .unwrap();

    assert_eq!(child.resolve_fields().len(), PRODUCT_FORM.resolve_fields().len() + 1);
    assert!(child.field("name").unwrap().is_writable());
    assert!(!PRODUCT_FORM.field("name").unwrap().is_writable());
    assert_eq!(child.writable_fields_for_owner("owner"), ["price", "name"]);

    let keys: Vec<&str> = child.resolve_owners().iter().map(|s| s.key().as_str()).collect();
    assert_eq!(keys, ["self", "test", "owner", "paint"]);
}

#[test]
fn grandchild_sees_whole_chain() {
    let child = FormSchema::builder("Child")
        .extends(&PRODUCT_FORM)
        .field("color", FieldOptions::owner("paint"))
        .build()
        .unwrap();
    let grandchild = FormSchema::builder("Grandchild")
        .extends(&child)
        .field("color", FieldOptions::owner("paint").writable())
        .build()
        .unwrap();

    assert!(grandchild.has_field("price"));
    assert!(grandchild.field("color").unwrap().is_writable());
    assert_eq!(
        grandchild.parent().and_then(|p| p.parent()).map(|p| p.name()),
        Some("ProductForm")
    );
}

#[test]
fn declaration_errors_surface_at_build() {
    let err = FormSchema::builder("Broken")
        .require_owner_valid("nobody")
        .build()
        .unwrap_err();
    assert!(matches!(err, FormError::Declaration(_)));
}

fn field_decl() -> impl Strategy<Value = (String, String, bool)> {
    (
        "[a-e]",
        prop_oneof![Just("self".to_string()), "[p-r]"],
        any::<bool>(),
    )
}

proptest! {
    #[test]
    fn resolved_fields_are_unique_and_owned(
        parent_decls in proptest::collection::vec(field_decl(), 0..8),
        child_decls in proptest::collection::vec(field_decl(), 0..8),
    ) {
        let mut builder = FormSchema::builder("Parent");
        for (name, owner, writable) in &parent_decls {
            let mut opts = FieldOptions::owner(owner.as_str());
            if *writable {
                opts = opts.writable();
            }
            builder = builder.field(name.as_str(), opts);
        }
        let parent = builder.build().unwrap();

        let mut builder = FormSchema::builder("Child").extends(&parent);
        for (name, owner, writable) in &child_decls {
            let mut opts = FieldOptions::owner(owner.as_str());
            if *writable {
                opts = opts.writable();
            }
            builder = builder.field(name.as_str(), opts);
        }
        let child = builder.build().unwrap();

        let names: Vec<&str> = child.resolve_fields().iter().map(|f| f.name()).collect();
        let mut deduped = names.clone();
        deduped.sort_unstable();
        deduped.dedup();
        prop_assert_eq!(deduped.len(), names.len());

        for field in child.resolve_fields() {
            prop_assert!(child.owner(field.owner().as_str()).is_some());
        }
        prop_assert!(child.resolve_owners()[0].is_self());

        // the last declaration of a name wins, child over parent
        let mut expected = std::collections::BTreeMap::new();
        for (name, owner, writable) in parent_decls.iter().chain(child_decls.iter()) {
            expected.insert(name.as_str(), (owner.as_str(), *writable));
        }
        prop_assert_eq!(expected.len(), names.len());
        for (name, (owner, writable)) in expected {
            let spec = child.field(name).unwrap();
            prop_assert_eq!(spec.owner().as_str(), owner);
            prop_assert_eq!(spec.is_writable(), writable);
        }
    }
}
