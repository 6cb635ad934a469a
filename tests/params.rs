use game_exchange_api::routes::params::{Condition, ListingStatus, Pagination};

#[test]
fn pagination_defaults() {
    let p = Pagination {
        page: None,
        per_page: None,
    };
    assert_eq!(p.normalize(), (1, 20, 0));
}

#[test]
fn pagination_clamps_out_of_range_values() {
    let p = Pagination {
        page: Some(0),
        per_page: Some(1000),
    };
    assert_eq!(p.normalize(), (1, 100, 0));

    let p = Pagination {
        page: Some(-3),
        per_page: Some(0),
    };
    assert_eq!(p.normalize(), (1, 1, 0));
}

#[test]
fn pagination_offset() {
    let p = Pagination {
        page: Some(3),
        per_page: Some(25),
    };
    assert_eq!(p.normalize(), (3, 25, 50));
}

#[test]
fn pagination_offset_saturates_for_huge_pages() {
    let p = Pagination {
        page: Some(i64::MAX),
        per_page: Some(100),
    };
    let (page, per_page, offset) = p.normalize();
    assert_eq!(page, i64::MAX);
    assert_eq!(per_page, 100);
    assert_eq!(offset, i64::MAX);
}

#[test]
fn condition_wire_format_matches_storage() {
    let c: Condition = serde_json::from_str("\"like_new\"").expect("condition");
    assert_eq!(c, Condition::LikeNew);
    assert_eq!(c.as_str(), "like_new");

    assert!(serde_json::from_str::<Condition>("\"mint\"").is_err());
}

#[test]
fn status_wire_format_matches_storage() {
    let s: ListingStatus = serde_json::from_str("\"sold\"").expect("status");
    assert_eq!(s, ListingStatus::Sold);
    assert_eq!(s.as_str(), "sold");
}
