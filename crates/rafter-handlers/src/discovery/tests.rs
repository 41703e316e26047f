//! Unit tests for capability discovery.

use rstest::{fixture, rstest};

use super::*;

struct CsvTableReader;

impl HandlerType for CsvTableReader {
    fn roles() -> &'static [RoleId] {
        &[RoleId::Source, RoleId::Table]
    }
}

struct TiffStackReader;

impl HandlerType for TiffStackReader {
    fn roles() -> &'static [RoleId] {
        &[RoleId::Source, RoleId::Frame, RoleId::Image]
    }
}

struct HistogramWriter;

impl HandlerType for HistogramWriter {
    fn roles() -> &'static [RoleId] {
        &[RoleId::Sink, RoleId::Distribution]
    }
}

/// Reader whose optional runtime dependency is missing.
struct HdfVolumeReader;

impl HandlerType for HdfVolumeReader {
    fn roles() -> &'static [RoleId] {
        &[RoleId::Source, RoleId::Frame, RoleId::Volume]
    }

    fn available() -> bool {
        false
    }
}

#[fixture]
fn catalog() -> Catalog {
    let mut catalog = Catalog::new();
    catalog.register::<CsvTableReader>().expect("register csv");
    catalog.register::<TiffStackReader>().expect("register tiff");
    catalog
        .register::<HistogramWriter>()
        .expect("register histogram");
    catalog
        .register::<HdfVolumeReader>()
        .expect("register hdf");
    catalog
}

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

#[test]
fn id_is_the_lowercased_type_name() {
    assert_eq!(CsvTableReader::id(), "csvtablereader");
    assert_eq!(TiffStackReader::id(), "tiffstackreader");
}

#[test]
fn id_strips_module_path_and_generics() {
    struct Wrapper<T>(std::marker::PhantomData<T>);

    impl<T> HandlerType for Wrapper<T> {
        fn roles() -> &'static [RoleId] {
            &[RoleId::Source]
        }
    }

    assert_eq!(Wrapper::<CsvTableReader>::id(), "wrapper");
}

#[test]
fn role_ids_are_kebab_case() {
    assert_eq!(RoleId::Distribution.as_str(), "distribution");
    assert_eq!(RoleId::Tomography.to_string(), "tomography");
    let encoded = serde_json::to_string(&RoleId::Frame).expect("serialises");
    assert_eq!(encoded, "\"frame\"");
}

#[test]
fn descriptor_reflects_the_type_declaration() {
    let descriptor = HdfVolumeReader::descriptor();
    assert_eq!(descriptor.id(), "hdfvolumereader");
    assert!(descriptor.implements(RoleId::Volume));
    assert!(!descriptor.implements(RoleId::Sink));
    assert!(!descriptor.is_available());
}

// ---------------------------------------------------------------------------
// Registration
// ---------------------------------------------------------------------------

#[test]
fn new_catalog_is_empty() {
    let catalog = Catalog::new();
    assert!(catalog.is_empty());
    assert_eq!(catalog.len(), 0);
}

#[test]
fn register_rejects_duplicate_ids() {
    let mut catalog = Catalog::new();
    catalog.register::<CsvTableReader>().expect("first register");
    let err = catalog
        .register::<CsvTableReader>()
        .expect_err("duplicate should fail");
    assert!(matches!(err, HandlerError::Catalog { .. }));
    assert!(err.to_string().contains("already registered"));
}

// ---------------------------------------------------------------------------
// Discovery
// ---------------------------------------------------------------------------

#[rstest]
fn discover_returns_every_implementation_in_registration_order(catalog: Catalog) {
    let sources = catalog.discover(RoleId::Source, None);
    let ids: Vec<&str> = sources.iter().map(|d| d.id()).collect();
    assert_eq!(
        ids,
        vec!["csvtablereader", "tiffstackreader", "hdfvolumereader"]
    );
}

#[rstest]
fn discover_filter_narrows_to_matching_roles(catalog: Catalog) {
    let tables = catalog.discover(RoleId::Source, Some(&[RoleId::Table]));
    let ids: Vec<&str> = tables.iter().map(|d| d.id()).collect();
    assert_eq!(ids, vec!["csvtablereader"]);
}

#[rstest]
fn discover_filter_is_an_or_across_the_set(catalog: Catalog) {
    let matches = catalog.discover(RoleId::Source, Some(&[RoleId::Table, RoleId::Volume]));
    let ids: Vec<&str> = matches.iter().map(|d| d.id()).collect();
    assert_eq!(ids, vec!["csvtablereader", "hdfvolumereader"]);
}

#[rstest]
fn discover_returns_empty_for_unmatched_filter(catalog: Catalog) {
    let matches = catalog.discover(RoleId::Sink, Some(&[RoleId::Frame]));
    assert!(matches.is_empty());
}

#[rstest]
fn discover_lists_unavailable_handlers_flagged(catalog: Catalog) {
    let volumes = catalog.discover(RoleId::Source, Some(&[RoleId::Volume]));
    let reader = volumes.first().expect("hdf reader is listed");
    assert!(!reader.is_available());
}

#[rstest]
fn descriptors_preserve_registration_order(catalog: Catalog) {
    let ids: Vec<&str> = catalog.descriptors().iter().map(|d| d.id()).collect();
    assert_eq!(
        ids,
        vec![
            "csvtablereader",
            "tiffstackreader",
            "histogramwriter",
            "hdfvolumereader"
        ]
    );
}
