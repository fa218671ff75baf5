use chrono::TimeZone;

use super::*;

fn item(label: &str, path: Option<&str>, children: Vec<TaxonomyItem>) -> TaxonomyItem {
    TaxonomyItem {
        label: label.to_owned(),
        path: path.map(str::to_owned),
        category_id: None,
        children,
    }
}

fn sample_taxonomy() -> Taxonomy {
    Taxonomy {
        title: Some("Main menu".to_owned()),
        items: vec![
            TaxonomyItem {
                label: "Wall Panels".to_owned(),
                path: Some("/collections/panels".to_owned()),
                category_id: Some("cat-10".to_owned()),
                children: vec![
                    item("Oak", Some("/collections/oak-panels"), vec![]),
                    item("Walnut", None, vec![]),
                ],
            },
            item(
                "Doors",
                Some("https://shop.example.com/collections/doors?sort=new"),
                vec![item("Sliding Doors", None, vec![])],
            ),
            item("Contact", Some("/pages/contact#form"), vec![]),
        ],
    }
}

fn fixed_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap()
}

#[test]
fn slugify_collapses_punctuation_and_whitespace() {
    assert_eq!(slugify("Wall Panels & Trims"), "wall-panels-trims");
    assert_eq!(slugify("  --Panels--  "), "panels");
    assert_eq!(slugify("PANELS"), "panels");
    assert_eq!(slugify("!!!"), "");
}

#[test]
fn last_path_segment_handles_urls_and_paths() {
    assert_eq!(last_path_segment("/collections/panels"), Some("panels"));
    assert_eq!(last_path_segment("/collections/panels/"), Some("panels"));
    assert_eq!(
        last_path_segment("https://shop.example.com/collections/doors?sort=new"),
        Some("doors")
    );
    assert_eq!(last_path_segment("https://shop.example.com"), None);
    assert_eq!(last_path_segment("/pages/contact#form"), Some("contact"));
}

#[test]
fn build_preserves_sibling_order_and_derives_slugs() {
    let index = build_navigation_index("main-menu", &sample_taxonomy(), fixed_time()).unwrap();

    assert_eq!(index.tree.label, "Main menu");
    assert_eq!(index.tree.slug, "main-menu");
    let top: Vec<&str> = index.tree.children.iter().map(|n| n.slug.as_str()).collect();
    assert_eq!(top, vec!["panels", "doors", "contact"]);

    let panels = &index.tree.children[0];
    assert_eq!(panels.category_id.as_deref(), Some("cat-10"));
    let kids: Vec<&str> = panels.children.iter().map(|n| n.slug.as_str()).collect();
    assert_eq!(kids, vec!["oak-panels", "walnut"]);
    assert_eq!(index.tree.children[1].children[0].slug, "sliding-doors");
}

#[test]
fn root_label_falls_back_to_menu_key() {
    let taxonomy = Taxonomy {
        title: None,
        items: vec![],
    };
    let index = build_navigation_index("footer", &taxonomy, fixed_time()).unwrap();
    assert_eq!(index.tree.label, "footer");
    assert_eq!(index.len(), 1);
    assert!(index.lookup("footer").is_some());
}

#[test]
fn slug_map_contains_every_node_exactly_once() {
    let index = build_navigation_index("main-menu", &sample_taxonomy(), fixed_time()).unwrap();

    let mut reachable = Vec::new();
    index.tree.walk(&mut |node| reachable.push(node));

    assert_eq!(reachable.len(), index.slug_map.len(), "no extra keys");
    for node in reachable {
        let mapped = index
            .lookup(&node.slug)
            .unwrap_or_else(|| panic!("slug {} missing from map", node.slug));
        assert_eq!(mapped, node);
    }
}

#[test]
fn rebuilding_from_identical_source_is_byte_identical() {
    let taxonomy = sample_taxonomy();
    let a = build_navigation_index("main-menu", &taxonomy, fixed_time()).unwrap();
    let b = build_navigation_index("main-menu", &taxonomy, fixed_time()).unwrap();

    assert_eq!(
        serde_json::to_vec(&a.tree).unwrap(),
        serde_json::to_vec(&b.tree).unwrap()
    );
    assert_eq!(
        serde_json::to_vec(&a.slug_map).unwrap(),
        serde_json::to_vec(&b.slug_map).unwrap()
    );
}

#[test]
fn duplicate_slugs_fail_with_collision() {
    let taxonomy = Taxonomy {
        title: None,
        items: vec![
            item("Panels", None, vec![]),
            item("Doors", None, vec![item("panels ", None, vec![])]),
        ],
    };

    let err = build_navigation_index("main-menu", &taxonomy, fixed_time()).unwrap_err();
    assert_eq!(
        err,
        NavigationError::SlugCollision {
            slug: "panels".to_owned(),
            first: "Panels".to_owned(),
            second: "panels".to_owned(),
        }
    );
}

#[test]
fn path_and_label_collisions_are_detected() {
    let taxonomy = Taxonomy {
        title: None,
        items: vec![
            item("All Panels", Some("/collections/panels"), vec![]),
            item("Panels", None, vec![]),
        ],
    };
    let err = build_navigation_index("main-menu", &taxonomy, fixed_time()).unwrap_err();
    assert!(matches!(err, NavigationError::SlugCollision { ref slug, .. } if slug == "panels"));
}

#[test]
fn item_colliding_with_root_slug_fails() {
    let taxonomy = Taxonomy {
        title: None,
        items: vec![item("Main Menu", None, vec![])],
    };
    let err = build_navigation_index("main-menu", &taxonomy, fixed_time()).unwrap_err();
    assert!(matches!(err, NavigationError::SlugCollision { .. }));
}

#[test]
fn unusable_label_fails_with_empty_slug() {
    let taxonomy = Taxonomy {
        title: None,
        items: vec![item("★★★", None, vec![])],
    };
    let err = build_navigation_index("main-menu", &taxonomy, fixed_time()).unwrap_err();
    assert_eq!(
        err,
        NavigationError::EmptySlug {
            label: "★★★".to_owned()
        }
    );
}

#[test]
fn index_serializes_with_expected_keys() {
    let index = build_navigation_index("main-menu", &sample_taxonomy(), fixed_time()).unwrap();
    let json = serde_json::to_value(&index).unwrap();
    assert_eq!(json["updated_at"], "2026-01-01T00:00:00Z");
    assert!(json["tree"]["children"].is_array());
    assert!(json["slug_map"]["oak-panels"].is_object());
    assert!(json["tree"].get("category_id").is_none());
}
