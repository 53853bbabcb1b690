use odata_core::{normalize_response, QueryResult};
use serde::Deserialize;
use serde_json::json;
use table_query::{build_query, PolicyCatalog, TableQueryConfig, TableState};

fn decoded(qs: &str) -> String {
    urlencoding::decode(qs).unwrap().into_owned()
}

#[test]
fn same_state_builds_same_query() {
    let policy = PolicyCatalog::admin_defaults().get("users").unwrap().clone();
    let state = TableState::page(2, 25)
        .sorted_by("email", true)
        .with_filter("lockoutEnabled", vec!["true", "false"])
        .with_global_filter("ann");
    assert_eq!(
        build_query(&state, &policy, None).unwrap(),
        build_query(&state, &policy, None).unwrap()
    );
}

#[test]
fn unfiltered_first_page() {
    let policy = TableQueryConfig::default().policy_for("users").unwrap();
    let qs = build_query(&TableState::page(0, 10), &policy, None).unwrap();
    assert!(qs.contains("$skip=0&$top=10&$count=true"), "{qs}");
    assert!(!qs.contains("$filter"), "{qs}");
}

#[test]
fn any_filter_resets_to_first_page() {
    let cfg = TableQueryConfig::default();
    for entity in ["users", "clients", "roles", "auditLogs"] {
        let policy = cfg.policy_for(entity).unwrap();
        let state = TableState::page(3, 20).with_filter("someField", "x");
        let qs = build_query(&state, &policy, None).unwrap();
        assert!(qs.contains("$skip=0&"), "{entity}: {qs}");
    }
}

#[test]
fn ui_payload_translates_end_to_end() {
    let state: TableState = serde_json::from_value(json!({
        "pagination": {"pageIndex": 1, "pageSize": 10},
        "sorting": [{"id": "userName", "desc": false}],
        "columnFilters": [
            {"id": "lockoutEnabled", "value": ["true"]},
            {"id": "email", "value": "a@b.com"},
            {"id": "id", "value": "a@b.com"}
        ],
        "globalFilter": ""
    }))
    .unwrap();
    let policy = TableQueryConfig::default().policy_for("users").unwrap();
    let qs = decoded(&build_query(&state, &policy, None).unwrap());
    assert_eq!(
        qs,
        "$filter=(lockoutEnabled eq true) and contains(email,'a@b.com') and id eq 'a@b.com'\
         &$orderby=userName asc&$skip=0&$top=10&$count=true"
    );
}

#[test]
fn search_term_is_one_or_group() {
    let policy = TableQueryConfig::default().policy_for("roles").unwrap();
    let qs = decoded(&build_query(&TableState::page(0, 10), &policy, Some("admin")).unwrap());
    assert!(
        qs.starts_with("$filter=(id eq 'admin' or contains(name,'admin'))&$orderby=name asc"),
        "{qs}"
    );
}

#[derive(Debug, Deserialize, PartialEq)]
struct Role {
    id: String,
    name: String,
}

#[test]
fn response_feeds_back_into_a_page() {
    let page: QueryResult<Role> = normalize_response(json!({
        "value": [{"id": "1", "name": "Admin"}, {"id": "2", "name": "Auditor"}],
        "@odata.count": 12,
        "@odata.nextLink": "roles?$skip=2"
    }));
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.items[0].id, "1");
    assert_eq!(page.items[1].name, "Auditor");
    assert_eq!(page.total_count, 12);
    assert!(page.has_more);
}
