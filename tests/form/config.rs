//! Config files driving owner error reporting

use crate::common::*;
use formwork::CONFIG_FILE_NAME;

#[test]
fn default_file_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);

    FormConfig::write_default_if_missing(&path).unwrap();
    let loaded = FormConfig::from_file(&path).unwrap();
    assert_eq!(loaded, FormConfig::default());
}

#[test]
fn invalid_owner_mode_is_rejected() {
    let err = FormConfig::from_toml_str("owner_errors = \"sometimes\"").unwrap_err();
    assert!(matches!(err, FormError::Config(_)));
}

#[test]
fn file_config_applies_to_schema() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    std::fs::write(&path, "invalid_owner_on_base = true\nvalidate_on_save = false\n").unwrap();
    let config = FormConfig::from_file(&path).unwrap();

    let schema = order_form(&config);
    let mut fixture = OrderFixture::with_schema(&schema, Record::new().requires("price"), Record::new());

    assert!(fixture.form.save(SaveOptions::new()).unwrap());
    assert_eq!(fixture.product.lock().validation_count(), 0);

    assert!(!fixture.form.is_valid().unwrap());
    assert_eq!(
        fixture.form.errors().get(Errors::BASE),
        ["product of type Record is invalid"]
    );
}
