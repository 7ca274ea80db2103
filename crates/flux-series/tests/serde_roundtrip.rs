use flux_series::{
    canonical_hash, from_json_slice, to_canonical_json_bytes, to_json_pretty, Fourier,
    FourierTerm, SeriesError, TensorSeries,
};
use ndarray::arr3;
use serde_json::json;

fn tensor() -> TensorSeries {
    let r = FourierTerm::cos(arr3(&[[[0.0, 5.5, 0.2]], [[0.1, 5.0, 0.3]]]), 5).unwrap();
    let z = FourierTerm::sin(arr3(&[[[0.0, 0.0, 0.1]], [[0.0, 0.2, 0.4]]]), 5).unwrap();
    TensorSeries::new(vec![Fourier::from_cos(r).unwrap(), Fourier::from_sin(z).unwrap()]).unwrap()
}

#[test]
fn tensor_survives_json_and_keeps_its_hash() {
    let original = tensor();
    let bytes = to_canonical_json_bytes(&original).unwrap();
    let restored: TensorSeries = from_json_slice(&bytes).unwrap();
    assert_eq!(restored, original);
    assert_eq!(canonical_hash(&restored).unwrap(), canonical_hash(&original).unwrap());
}

#[test]
fn hash_tracks_coefficient_changes() {
    let original = tensor();
    let mut nulled = original.clone();
    nulled.set_null();
    assert_eq!(canonical_hash(&original).unwrap().len(), 64);
    assert_ne!(canonical_hash(&original).unwrap(), canonical_hash(&nulled).unwrap());
}

#[test]
fn decoding_reruns_construction_checks() {
    let zero_nfp = json!({
        "kind": "cos",
        "coefficients": {"v": 1, "dim": [1, 1, 1], "data": [1.0]},
        "num_field_periods": 0
    });
    let err = from_json_slice::<FourierTerm>(zero_nfp.to_string().as_bytes()).unwrap_err();
    assert!(matches!(err, SeriesError::Serde(_)));
    assert_eq!(err.code(), "series-deserialize");
    assert!(err.info().message.contains("field period"));

    let empty = json!({"cos": null, "sin": null});
    let err = from_json_slice::<Fourier>(empty.to_string().as_bytes()).unwrap_err();
    assert!(err.info().message.contains("empty-series"));

    let err = from_json_slice::<TensorSeries>(br#"{"components": []}"#).unwrap_err();
    assert!(err.info().message.contains("empty-tensor"));
}

#[test]
fn malformed_json_is_a_serde_error() {
    let err = from_json_slice::<Fourier>(b"{not json").unwrap_err();
    assert_eq!(err.code(), "series-deserialize");
}

#[test]
fn pretty_output_names_the_term_kind() {
    let text = to_json_pretty(&tensor()).unwrap();
    assert!(text.contains("\"kind\": \"cos\""));
    assert!(text.contains("\"num_field_periods\": 5"));
}
