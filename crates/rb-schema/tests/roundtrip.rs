use rb_core::{RecordId, SubItemId};
use rb_schema::*;

fn sample_dataset() -> Dataset {
    let institution = Institution {
        id: RecordId::new("i1"),
        created_at: "2026-01-05T08:00:00Z".to_string(),
        name: "Oranim".to_string(),
        kind: InstitutionType::Kindergarten,
        type_other: None,
        letter_code: Some("B".to_string()),
        address: "School St 5".to_string(),
        city: Some("Tel Aviv".to_string()),
        subtype: InstitutionSubtype::LanguageDelay,
        subtype_other: None,
        map_link: None,
        image_ref: None,
        contacts: vec![Contact {
            id: SubItemId::new("k1"),
            first_name: "Dana".to_string(),
            last_name: "Levi".to_string(),
            phone: "0501112222".to_string(),
            role: ContactRole::Teacher,
            role_other: None,
        }],
    };

    let child = Child {
        id: RecordId::new("c1"),
        created_at: "2026-01-05T09:00:00Z".to_string(),
        first_name: "Noa".to_string(),
        last_name: "Cohen".to_string(),
        gender: Gender::Female,
        age: 6,
        phone: None,
        home_address: "Herzl 1".to_string(),
        city: Some("Tel Aviv".to_string()),
        disability: Some("hearing".to_string()),
        notes: None,
        parents: vec![Parent {
            id: SubItemId::new("p1"),
            first_name: "Ruth".to_string(),
            last_name: "Cohen".to_string(),
            relation: Relation::Mother,
            relation_other: None,
            phone: "0501234567".to_string(),
        }],
        assigned_institutions: vec![InstitutionAssignment {
            institution_id: RecordId::new("i1"),
            contact: Some(SubItemRef::Id(SubItemId::new("k1"))),
        }],
        assigned_authorities: vec![],
        escort_id: None,
    };

    let route = Route {
        id: RecordId::new("r1"),
        created_at: "2026-01-06T07:00:00Z".to_string(),
        name: "Line 1".to_string(),
        route_type: RouteType::Morning,
        is_permanent: true,
        active_days: [ActiveDay::Weekdays, ActiveDay::Friday].into_iter().collect(),
        children: vec![ChildInRoute {
            child_id: RecordId::new("c1"),
            pickup_time: "07:45".to_string(),
            pickup_address: "Herzl 1, Tel Aviv".to_string(),
            dropoff_address: Some("School St 5, Tel Aviv".to_string()),
            source_digest: None,
        }],
        notes: None,
    };

    Dataset {
        version: LATEST_VERSION,
        children: vec![child],
        institutions: vec![institution],
        routes: vec![route],
        ..Dataset::default()
    }
}

#[test]
fn roundtrip_yaml_dataset() {
    let dataset = sample_dataset();
    let path = std::env::temp_dir().join("rb_schema_roundtrip.yaml");

    save_yaml(&path, &dataset).unwrap();
    let loaded = load_yaml(&path).unwrap();

    assert_eq!(dataset, loaded);
}

#[test]
fn roundtrip_json_dataset_by_extension() {
    let dataset = sample_dataset();
    let path = std::env::temp_dir().join("rb_schema_roundtrip.json");

    save_dataset(&path, &dataset).unwrap();
    let loaded = load_dataset(&path).unwrap();

    assert_eq!(dataset, loaded);
}

#[test]
fn load_legacy_positional_references() {
    let legacy = r#"{
        "version": 1,
        "children": [{
            "id": "c1",
            "first_name": "Noa",
            "last_name": "Cohen",
            "gender": "female",
            "age": 6,
            "home_address": "Herzl 1",
            "parents": [],
            "assigned_institutions": [{"institution_id": "i1", "contact_index": 0}],
            "assigned_authorities": [{"authority_id": "a1", "supervisor_index": -1}]
        }],
        "institutions": [{
            "id": "i1",
            "name": "Oranim",
            "type": "school",
            "address": "School St 5",
            "subtype": "autism",
            "contacts": [{
                "id": "k1",
                "first_name": "Dana",
                "last_name": "Levi",
                "phone": "0501112222",
                "role": "teacher"
            }]
        }],
        "authorities": [{"id": "a1", "name": "City", "supervisors": []}]
    }"#;
    let path = std::env::temp_dir().join("rb_schema_legacy.json");
    std::fs::write(&path, legacy).unwrap();

    let loaded = load_json(&path).unwrap();
    assert_eq!(loaded.version, LATEST_VERSION);

    let child = &loaded.children[0];
    assert_eq!(
        child.assigned_institutions[0].contact,
        Some(SubItemRef::Id(SubItemId::new("k1")))
    );
    assert_eq!(child.assigned_authorities[0].supervisor, None);
}

#[test]
fn save_rejects_invalid_dataset() {
    let mut dataset = sample_dataset();
    dataset.routes[0].children[0].pickup_time = "7".to_string();

    let path = std::env::temp_dir().join("rb_schema_invalid.yaml");
    let err = save_yaml(&path, &dataset).unwrap_err();
    assert!(matches!(err, SchemaError::Validation(_)));
}
