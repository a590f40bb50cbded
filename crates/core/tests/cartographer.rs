mod common;

use cartographer_core::{
    BundleOverrides, Cartographer, CartographerConfig, CartographerError, MiniJinjaRenderer,
    Origin, ParseOutcome, PrefixUrlResolver, split_kinds,
};
use common::{done, files, webpack_config, write_stats};
use indexmap::IndexMap;
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::tempdir;

#[test]
fn test_autodiscover_and_render() {
    let dir = tempdir().unwrap();
    let stats = dir.path().join("webpack-stats.json");
    write_stats(
        &stats,
        &done(json!({ "main": files(&["vendor.js", "main.css", "main.js", "main.js.map"]) })),
    );

    let cartographer = Cartographer::builder(webpack_config(&stats, &["main"]))
        .build()
        .unwrap();
    let outcomes = cartographer.autodiscover().unwrap();
    assert!(outcomes.iter().all(ParseOutcome::is_ready));

    let all = cartographer.render_bundle::<&str>("main", None).unwrap();
    assert_eq!(
        all,
        "<script type=\"text/javascript\" src=\"/static/webpack_bundles/vendor.js\"></script>\n\
         <link type=\"text/css\" href=\"/static/webpack_bundles/main.css\" rel=\"stylesheet\">\n\
         <script type=\"text/javascript\" src=\"/static/webpack_bundles/main.js\"></script>"
    );

    let kinds = split_kinds("css");
    let css = cartographer.render_bundle("main", Some(kinds.as_slice())).unwrap();
    assert_eq!(
        css,
        "<link type=\"text/css\" href=\"/static/webpack_bundles/main.css\" rel=\"stylesheet\">"
    );
}

#[test]
fn test_custom_templates_and_prefix() {
    let dir = tempdir().unwrap();
    let stats = dir.path().join("webpack-stats.json");
    write_stats(&stats, &done(json!({ "main": files(&["main.js"]) })));

    let templates = dir.path().join("templates");
    std::fs::create_dir_all(templates.join("site")).unwrap();
    std::fs::write(
        templates.join("site/js.html"),
        "<script defer src=\"{{ ASSET_URL }}\"></script>",
    )
    .unwrap();

    let overrides = BundleOverrides {
        source: Some(stats.clone()),
        bundles_dirname: Some("dist".to_string()),
        tag_templates: Some(IndexMap::from([(
            "js".to_string(),
            "site/js.html".to_string(),
        )])),
        ..Default::default()
    };
    let config = CartographerConfig::new().with_bundle(Origin::Webpack, "main", overrides);

    let cartographer = Cartographer::builder(config)
        .with_renderer(Arc::new(MiniJinjaRenderer::with_template_dir(&templates)))
        .with_url_resolver(Arc::new(PrefixUrlResolver::new("https://cdn.example.com/assets")))
        .build()
        .unwrap();
    cartographer.autodiscover().unwrap();

    assert_eq!(
        cartographer.render_bundle::<&str>("main", None).unwrap(),
        "<script defer src=\"https://cdn.example.com/assets/dist/main.js\"></script>"
    );
}

#[test]
fn test_load_config_file() {
    let dir = tempdir().unwrap();
    write_stats(
        &dir.path().join("webpack-stats.json"),
        &done(json!({ "main": files(&["main.js"]), "admin": files(&["admin.js"]) })),
    );
    let config_path = dir.path().join("cartographer.json");
    std::fs::write(
        &config_path,
        r#"{ "WEBPACK": { "main": {}, "admin": { "IGNORE": ["admin"] } } }"#,
    )
    .unwrap();

    let config = CartographerConfig::load(&config_path).unwrap();
    let cartographer = Cartographer::builder(config).build().unwrap();
    cartographer.autodiscover().unwrap();

    let registry = cartographer.registry();
    assert_eq!(registry.bundle_names(), ["main", "admin"]);
    assert_eq!(registry.bundle("admin").unwrap().len(), 0);
    assert_eq!(
        cartographer.watch_paths(),
        [dir.path().join("webpack-stats.json")]
    );
}

#[test]
fn test_autodiscover_fails_fast() {
    let dir = tempdir().unwrap();
    let broken = dir.path().join("broken-stats.json");
    write_stats(
        &broken,
        &json!({ "status": "error", "error": "SyntaxError", "file": "a.js", "message": "x" }),
    );
    let ok = dir.path().join("ok-stats.json");
    write_stats(&ok, &done(json!({ "admin": files(&["admin.js"]) })));

    let config = webpack_config(&broken, &["main"]).with_bundle(
        Origin::Webpack,
        "admin",
        BundleOverrides {
            source: Some(ok),
            ..Default::default()
        },
    );
    let cartographer = Cartographer::builder(config).build().unwrap();

    let err = cartographer.autodiscover().unwrap_err();
    assert_eq!(err.to_string(), "SyntaxError in a.js\nx");
    assert!(cartographer.registry().is_empty());
}

#[test]
fn test_rediscover_is_best_effort() {
    let dir = tempdir().unwrap();
    let main_stats = dir.path().join("main-stats.json");
    let admin_stats = dir.path().join("admin-stats.json");
    write_stats(&main_stats, &json!({ "status": "compiling" }));
    write_stats(&admin_stats, &done(json!({ "admin": files(&["admin-1.js"]) })));

    let config = webpack_config(&main_stats, &["main"]).with_bundle(
        Origin::Webpack,
        "admin",
        BundleOverrides {
            source: Some(admin_stats.clone()),
            ..Default::default()
        },
    );
    let cartographer = Cartographer::builder(config).build().unwrap();

    let outcomes = cartographer.autodiscover().unwrap();
    assert_eq!(outcomes[0], ParseOutcome::Compiling);
    assert!(!cartographer.registry().contains_bundle("main"));

    // Still-compiling groups are watched before they register anything
    assert_eq!(
        cartographer.watch_paths(),
        [admin_stats.clone(), main_stats.clone()]
    );

    std::fs::write(&main_stats, "not json").unwrap();
    write_stats(&admin_stats, &done(json!({ "admin": files(&["admin-2.js"]) })));

    let reports = cartographer.rediscover();
    assert_eq!(reports.len(), 2);
    assert!(matches!(
        reports[0].result,
        Err(CartographerError::ManifestDecode { .. })
    ));
    assert!(reports[0].result.as_ref().unwrap_err().is_transient());
    assert_eq!(reports[1].bundle, "admin");
    assert!(reports[1].result.is_ok());

    let admin = cartographer.registry().bundle("admin").unwrap();
    let names: Vec<_> = admin.assets().map(|a| a.name.clone()).collect();
    assert_eq!(names, ["admin-2.js"]);

    write_stats(&main_stats, &done(json!({ "main": files(&["main.js"]) })));
    cartographer.rediscover();
    assert!(cartographer.registry().contains_bundle("main"));
}

#[test]
fn test_invalid_config_rejected_before_parsing() {
    let config = CartographerConfig::new().with_bundle(
        Origin::Webpack,
        "main",
        BundleOverrides {
            ignore: Some(vec!["(".to_string()]),
            source: Some(PathBuf::from("does-not-exist.json")),
            ..Default::default()
        },
    );

    assert!(matches!(
        Cartographer::builder(config).build(),
        Err(CartographerError::InvalidIgnorePattern { .. })
    ));
}

#[test]
fn test_directory_group_fails_autodiscover() {
    let dir = tempdir().unwrap();
    let config = CartographerConfig::new().with_bundle(
        Origin::Directory,
        "vendor",
        BundleOverrides {
            source: Some(dir.path().to_path_buf()),
            ..Default::default()
        },
    );
    let cartographer = Cartographer::builder(config).build().unwrap();

    assert!(matches!(
        cartographer.autodiscover(),
        Err(CartographerError::UnsupportedOrigin(Origin::Directory))
    ));
    // non-updatable groups are never re-parsed or watched
    assert!(cartographer.rediscover().is_empty());
    assert!(cartographer.watch_paths().is_empty());
}

#[test]
fn test_render_during_refresh_sees_whole_bundles() {
    let dir = tempdir().unwrap();
    let stats = dir.path().join("webpack-stats.json");
    let generations = [
        ["main-1.js", "main-1.css", "vendor-1.js"],
        ["main-2.js", "main-2.css", "vendor-2.js"],
    ];
    write_stats(&stats, &done(json!({ "main": files(&generations[0]) })));

    let cartographer = Cartographer::builder(webpack_config(&stats, &["main"]))
        .build()
        .unwrap();
    cartographer.autodiscover().unwrap();

    // Rendered output of each generation
    let expected: Vec<String> = generations
        .iter()
        .map(|names| {
            write_stats(&stats, &done(json!({ "main": files(names) })));
            cartographer.rediscover();
            cartographer.render_bundle::<&str>("main", None).unwrap()
        })
        .collect();

    std::thread::scope(|scope| {
        let readers: Vec<_> = (0..4)
            .map(|_| {
                scope.spawn(|| {
                    for _ in 0..500 {
                        let tags = cartographer.render_bundle::<&str>("main", None).unwrap();
                        assert!(expected.contains(&tags), "partial bundle rendered: {tags}");
                    }
                })
            })
            .collect();

        for i in 0..50 {
            let names = &generations[i % 2];
            write_stats(&stats, &done(json!({ "main": files(names) })));
            for report in cartographer.rediscover() {
                report.result.unwrap();
            }
        }

        for reader in readers {
            reader.join().unwrap();
        }
    });
}
