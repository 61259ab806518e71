use latgas_core::errors::{ErrorInfo, LatgasError};
use latgas_core::{Lattice, Site};

fn sample_info(code: &str, message: &str) -> ErrorInfo {
    ErrorInfo::new(code, message)
        .with_context("row", "4")
        .with_context("reason", "example")
}

fn family(err: &LatgasError) -> &'static str {
    match err {
        LatgasError::OutOfBounds(_) => "bounds",
        LatgasError::Config(_) => "config",
        LatgasError::State(_) => "state",
    }
}

#[test]
fn every_family_exposes_its_payload() {
    let errors = [
        LatgasError::OutOfBounds(sample_info("B001", "row past the edge")),
        LatgasError::Config(sample_info("C001", "temperature is zero")),
        LatgasError::State(sample_info("S001", "already running")),
    ];
    let expected = [("B001", "bounds"), ("C001", "config"), ("S001", "state")];
    for (err, (code, name)) in errors.iter().zip(expected) {
        assert_eq!(err.code(), code);
        assert_eq!(family(err), name);
        assert!(err.info().context.contains_key("row"));
        assert!(err.info().hint.is_none());
    }
}

#[test]
fn lattice_errors_carry_coordinates() {
    let lattice = Lattice::empty(4, 3).unwrap();
    let err = lattice.occupancy_at(Site::new(1, 4)).unwrap_err();
    assert!(matches!(err, LatgasError::OutOfBounds(_)));
    let context = &err.info().context;
    assert_eq!(context["row"], "1");
    assert_eq!(context["col"], "4");
    assert_eq!(context["width"], "4");
}

#[test]
fn overflowing_dimensions_are_a_config_error() {
    let err = Lattice::empty(usize::MAX, 2).unwrap_err();
    assert!(matches!(err, LatgasError::Config(_)));
    assert_eq!(err.code(), "lattice-too-large");
}
