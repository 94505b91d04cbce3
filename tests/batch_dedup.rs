//! Batch dedup invariant (spec §8 property 7, spec.md:145): a batch with
//! duplicate/aliased URLs issues exactly one scan per distinct canonical
//! form. Exercises the same dedup path `scan_batch_full_details` uses,
//! without performing any network I/O.

use httpobs::api::handlers::dedup_canonical_site_keys;

#[test]
fn duplicate_and_aliased_urls_collapse_to_one_scan_per_canonical_form() {
    let urls = vec![
        "https://example.test/".to_string(),
        "HTTPS://EXAMPLE.TEST".to_string(),
        "  example.test  ".to_string(),
        "example.test".to_string(),
        "other.test".to_string(),
        "OTHER.test/".to_string(),
    ];

    let (canonical, invalid) = dedup_canonical_site_keys(&urls, false);

    assert!(invalid.is_empty());
    assert_eq!(canonical.len(), 2, "six aliased inputs should collapse to two distinct scans");

    let mut sorted = canonical.clone();
    sorted.sort();
    assert_eq!(sorted, vec!["example.test".to_string(), "other.test".to_string()]);
}

#[test]
fn distinct_hosts_each_get_their_own_scan() {
    let urls = vec!["a.test".to_string(), "b.test".to_string(), "c.test".to_string()];
    let (canonical, invalid) = dedup_canonical_site_keys(&urls, false);
    assert!(invalid.is_empty());
    assert_eq!(canonical.len(), 3);
}

#[test]
fn invalid_inputs_are_excluded_from_the_canonical_scan_set() {
    let urls = vec!["example.test".to_string(), "nodothost".to_string(), "".to_string()];
    let (canonical, invalid) = dedup_canonical_site_keys(&urls, false);
    assert_eq!(canonical, vec!["example.test".to_string()]);
    assert_eq!(invalid.len(), 2);
}
