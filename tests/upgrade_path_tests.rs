use dbupgrade::{UpgradeError, UpgradePath, UpgradeResolver, Version};

fn v(raw: &str) -> Version {
    Version::parse(raw).unwrap()
}

fn resolve(from: &str, to: &str) -> UpgradePath {
    let resolver = UpgradeResolver::new().unwrap();
    resolver.calculate_upgrade_path(&v(from), &v(to)).unwrap()
}

fn names(path: &UpgradePath) -> Vec<&str> {
    path.iter().map(|step| step.name()).collect()
}

#[test]
fn test_calculate_upgrade_path_480_to_481() {
    let path = resolve("4.8.0", "4.8.1");

    assert_eq!(names(&path), vec!["480to481"]);
    assert_eq!(path.steps()[0].target_version(), v("4.8.1"));
    assert_eq!(path.steps()[0].upgraded_version(), v("4.8.1").to_string());
}

#[test]
fn test_calculate_upgrade_path_490_to_4910() {
    let target = v("4.9.1.0");
    let path = resolve("4.9.0", "4.9.1.0");

    assert_eq!(path.len(), 1);
    let step = &path.steps()[0];
    assert_eq!(step.name(), "490to4910");
    assert_eq!(step.upgradable_version_range(), ("4.9.0", "4.9.1.0"));
    assert_eq!(step.upgraded_version(), target.to_string());
}

#[test]
fn test_calculate_upgrade_path_410_to_412() {
    let path = resolve("4.10.0.0", "4.12.0.0");

    assert_eq!(
        names(&path),
        vec![
            "41000to41100",
            "41100to41110",
            "41110to41120",
            "41120to41130",
            "41120to41200"
        ]
    );
    assert_eq!(
        path.steps()[1].upgradable_version_range(),
        ("4.11.0.0", "4.11.1.0")
    );
    assert_eq!(path.steps()[4].upgraded_version(), "4.12.0.0");
}

#[test]
fn test_find_upgrade_path_470_to_481() {
    let path = resolve("4.7.0", "4.8.1");
    assert_eq!(names(&path), vec!["470to471", "471to480", "480to481"]);
}

#[test]
fn test_find_upgrade_path_452_to_490() {
    let target = v("4.9.0");
    let path = resolve("4.5.2", "4.9.0");

    assert_eq!(
        names(&path),
        vec![
            "452to453", "453to460", "460to461", "461to470", "470to471", "471to480", "480to481",
            "481to490"
        ]
    );
    let last = path.last().unwrap();
    assert_eq!(last.upgradable_version_range().0, "4.8.1");
    assert_eq!(last.upgraded_version(), target.to_string());
}

#[test]
fn test_unknown_db_version_gets_single_noop() {
    let path = resolve("4.99.0.0", "4.99.1.0");

    assert_eq!(path.len(), 1, "We should have 1 upgrade step");
    let step = &path.steps()[0];
    assert!(step.is_identity());
    assert_eq!(step.upgradable_version_range(), ("4.99.0.0", "4.99.1.0"));
    assert_eq!(step.upgraded_version(), "4.99.1.0");
}

#[test]
fn test_known_db_version_to_unknown_target_ends_in_noop() {
    let path = resolve("4.17.0.0", "4.99.1.0");

    assert!(path.len() > 2);
    let last = path.last().unwrap();
    assert!(last.is_identity());
    assert_eq!(last.upgradable_version_range(), ("4.19.0.0", "4.99.1.0"));
    assert!(path.steps()[..path.len() - 1].iter().all(|s| !s.is_identity()));
}

#[test]
fn test_unregistered_security_version_routes_like_base_release() {
    let path = resolve("4.15.1.3", "4.17.0.0");

    assert!(path.len() > 1);
    assert_eq!(path.first().unwrap().name(), "41510to41520");
    assert_eq!(path.last().unwrap().name(), "41610to41700");

    let from_base = resolve("4.15.1.0", "4.17.0.0");
    assert_eq!(names(&path), names(&from_base));
}

#[test]
fn test_latest_db_version_to_next_security_release() {
    let resolver = UpgradeResolver::new().unwrap();
    let latest = resolver.latest_version();
    let next = latest.with_security(latest.security() + 1);

    let path = resolver.calculate_upgrade_path(&latest, &next).unwrap();
    assert_eq!(path.len(), 1, "We should have 1 upgrade step");
    assert!(path.steps()[0].is_identity());
    assert_eq!(path.steps()[0].upgraded_version(), next.to_string());
}

#[test]
fn test_41800_to_next_security_release_adds_one_noop() {
    let resolver = UpgradeResolver::new().unwrap();
    let installed = v("4.18.0.0");
    let latest = resolver.latest_version();
    let next = latest.with_security(latest.security() + 1);

    let to_latest = resolver.calculate_upgrade_path(&installed, &latest).unwrap();
    let to_next = resolver.calculate_upgrade_path(&installed, &next).unwrap();

    assert_eq!(to_latest.len() + 1, to_next.len());
    assert!(!to_latest.last().unwrap().is_identity());
    let last = to_next.last().unwrap();
    assert!(last.is_identity());
    assert_eq!(
        last.upgradable_version_range(),
        (latest.to_string().as_str(), next.to_string().as_str())
    );
}

#[test]
fn test_eol_security_release_routes_like_its_base() {
    let resolver = UpgradeResolver::new().unwrap();
    let installed = v("4.17.2.0");
    let old_security_release = installed.with_security(installed.security() + 100);
    let latest = resolver.latest_version();

    let upgrades = resolver.calculate_upgrade_path(&installed, &latest).unwrap();
    let from_security_release = resolver
        .calculate_upgrade_path(&old_security_release, &latest)
        .unwrap();

    assert_eq!(
        upgrades.len(),
        from_security_release.len(),
        "The upgrade paths should be the same"
    );
}

#[test]
fn test_eol_security_release_to_next_security_release() {
    let resolver = UpgradeResolver::new().unwrap();
    let installed = v("4.17.2.0");
    let old_security_release = installed.with_security(100);
    let latest = resolver.latest_version();
    let next = latest.with_security(latest.security() + 1);

    let upgrades = resolver.calculate_upgrade_path(&installed, &latest).unwrap();
    let to_next = resolver
        .calculate_upgrade_path(&old_security_release, &next)
        .unwrap();

    assert_eq!(upgrades.len() + 1, to_next.len());
    assert!(to_next.last().unwrap().is_identity());
}

#[test]
fn test_same_version_gets_single_noop() {
    let path = resolve("4.16.0.0", "4.16.0.0");

    assert_eq!(path.len(), 1);
    assert!(path.steps()[0].is_identity());
    assert_eq!(path.steps()[0].upgraded_version(), "4.16.0.0");
}

#[test]
fn test_security_bump_within_known_release_gets_noop() {
    let path = resolve("4.15.1.3", "4.15.1.5");

    assert_eq!(path.len(), 1);
    assert!(path.steps()[0].is_identity());
    assert_eq!(
        path.steps()[0].upgradable_version_range(),
        ("4.15.1.3", "4.15.1.5")
    );
}

#[test]
fn test_target_between_known_releases_is_stamped() {
    let path = resolve("4.11.0.0", "4.11.1.5");

    assert_eq!(names(&path), vec!["41100to41110", "noop"]);
    assert_eq!(
        path.last().unwrap().upgradable_version_range(),
        ("4.11.1.0", "4.11.1.5")
    );
}

#[test]
fn test_patch_branch_from_443_rejoins_main_line() {
    let path = resolve("4.4.3", "4.5.1");
    assert_eq!(names(&path), vec!["443to444", "444to450", "450to451"]);
}

#[test]
fn test_main_line_from_442_skips_patch_branch() {
    let path = resolve("4.4.0", "4.5.1");
    assert_eq!(
        names(&path),
        vec!["440to441", "441to442", "442to450", "450to451"]
    );
}

#[test]
fn test_307_jumps_past_40_line() {
    let path = resolve("3.0.6", "4.2.0");
    assert_eq!(names(&path), vec!["306to307", "307to410", "410to420"]);

    let from_40 = resolve("4.0.1", "4.2.0");
    assert_eq!(names(&from_40), vec!["40to41", "410to420"]);
}

#[test]
fn test_patch_range_funnels_into_shared_step() {
    let from_461 = resolve("4.6.1", "4.7.0");
    let from_462 = resolve("4.6.2", "4.7.0");

    assert_eq!(names(&from_461), vec!["461to470"]);
    assert_eq!(names(&from_462), vec!["461to470"]);
}

#[test]
fn test_full_history_upgrade_is_ordered() {
    let path = resolve("2.2.1", "4.19.0.0");

    assert!(path.first().unwrap().name() == "221to222");
    assert_eq!(path.last().unwrap().name(), "41810to41900");
    assert!(path.iter().all(|s| !s.is_identity()));
    assert!(!names(&path).contains(&"443to444"));
    assert!(!names(&path).contains(&"40to41"));
}

#[test]
fn test_downgrade_is_rejected() {
    let resolver = UpgradeResolver::new().unwrap();
    let err = resolver
        .calculate_upgrade_path(&v("4.18.0.0"), &v("4.17.0.0"))
        .unwrap_err();

    assert_eq!(
        err,
        UpgradeError::Downgrade {
            installed: v("4.18.0.0"),
            target: v("4.17.0.0"),
        }
    );
}

#[test]
fn test_path_serializes_to_json() {
    let path = resolve("4.9.0", "4.9.1.0");
    let json = serde_json::to_value(&path).unwrap();

    let step = &json["steps"][0];
    assert_eq!(step["name"], "490to4910");
    assert_eq!(step["target"], "4.9.1.0");
    assert_eq!(step["migration"]["kind"], "scripts");
}
