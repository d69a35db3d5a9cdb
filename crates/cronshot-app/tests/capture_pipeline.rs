//! 캡처 파이프라인 통합 테스트.
//!
//! 설정 → 규칙 매칭 → 폴더 해석 → 중복 판정 → PNG 저장 cross-crate 연동.

use chrono::{Local, TimeDelta};
use cronshot_core::config_manager::ConfigManager;
use cronshot_core::models::rule::Rule;
use cronshot_core::naming::{storage_dir, UNKNOWN_NAME};
use cronshot_core::ports::context::{ProcessContextProvider, SettingsProvider};
use cronshot_rules::{match_rule, resolve_folder};
use cronshot_vision::dedupe::{should_skip, DedupePolicy};
use cronshot_vision::storage::{latest_png, save_screenshot};
use image::{Rgba, RgbaImage};
use tempfile::TempDir;

fn make_image(color: [u8; 4]) -> RgbaImage {
    RgbaImage::from_pixel(64, 48, Rgba(color))
}

fn manager(temp: &TempDir, rules: Vec<Rule>) -> ConfigManager {
    let config = ConfigManager::with_path(temp.path().join("config.json")).unwrap();
    let root = temp.path().join("shots");
    config
        .update_with(move |c| {
            c.storage_root = root;
            c.current_process = "Editor.exe".to_string();
            c.rules = rules;
            c.dedupe_enabled = true;
            c.dedupe_threshold = 100;
        })
        .unwrap();
    config
}

/// 설정 스냅샷 하나로 창 제목 → 저장 경로까지
#[test]
fn title_to_saved_png() {
    let temp = TempDir::new().unwrap();
    let config = manager(
        &temp,
        vec![Rule::new(r"^Project: ")
            .with_storage_rule(r"Project: (\w+)")
            .with_fixed_folder("Work")],
    );

    let process = config.current_process();
    let rules = config.current_rules();
    let settings = config.current_settings();

    let title = "Project: Alpha - notes.md";
    let rule = match_rule(title, &rules).expect("규칙 매칭");
    let resolved = resolve_folder(title, Some(rule));
    assert_eq!(resolved.folder, "Alpha");

    let path = save_screenshot(
        &make_image([1, 2, 3, 255]),
        &settings.storage_root,
        &process,
        &resolved.fixed_folder,
        &resolved.folder,
        &Local::now(),
    )
    .unwrap();

    let expected_dir = settings.storage_root.join("Editor").join("Work").join("Alpha");
    assert_eq!(path.parent(), Some(expected_dir.as_path()));
    assert_eq!(latest_png(&expected_dir).unwrap(), Some(path));
}

/// 저장된 최신 이미지 기준 중복 판정
#[test]
fn dedupe_against_previous_save() {
    let temp = TempDir::new().unwrap();
    let config = manager(&temp, vec![Rule::new("Doc")]);
    let settings = config.current_settings();
    let policy = DedupePolicy::from_settings(&settings);
    let root = &settings.storage_root;

    let first = make_image([50, 60, 70, 255]);
    assert!(!should_skip(&first, root, "Editor.exe", "", "Doc", &policy).unwrap());
    save_screenshot(&first, root, "Editor.exe", "", "Doc", &Local::now()).unwrap();

    assert!(should_skip(&first, root, "Editor.exe", "", "Doc", &policy).unwrap());

    let mut changed = first.clone();
    changed.put_pixel(0, 0, Rgba([50, 60, 71, 255]));
    assert!(!should_skip(&changed, root, "Editor.exe", "", "Doc", &policy).unwrap());

    // 다른 폴더는 독립적으로 판정
    assert!(!should_skip(&first, root, "Editor.exe", "", "Other", &policy).unwrap());
}

/// 같은 틱의 여러 창은 밀리초 오프셋으로 파일명이 갈림
#[test]
fn tick_offsets_avoid_collisions() {
    let temp = TempDir::new().unwrap();
    let base = Local::now();
    let img = make_image([9, 9, 9, 255]);

    let paths: Vec<_> = (0..3)
        .map(|i| {
            save_screenshot(
                &img,
                temp.path(),
                "app",
                "",
                "Same",
                &(base + TimeDelta::milliseconds(i)),
            )
            .unwrap()
        })
        .collect();

    assert_ne!(paths[0], paths[1]);
    assert_ne!(paths[1], paths[2]);
    let count = std::fs::read_dir(storage_dir(temp.path(), "app", "", "Same"))
        .unwrap()
        .count();
    assert_eq!(count, 3);
}

/// 저장 규칙이 맞지 않으면 대체 폴더
#[test]
fn unmatched_storage_rule_uses_unknown_folder() {
    let rules = vec![Rule::new("Mail").with_storage_rule(r"Ticket #(\d+)")];
    let title = "Mail - Inbox";
    let rule = match_rule(title, &rules).unwrap();
    assert_eq!(resolve_folder(title, Some(rule)).folder, UNKNOWN_NAME);
}

/// 설정 변경이 다음 스냅샷에 반영되고 파일에 저장됨
#[test]
fn live_config_changes_persist() {
    let temp = TempDir::new().unwrap();
    let config = manager(&temp, vec![]);

    config
        .update_with(|c| {
            c.dedupe_threshold = 0;
            c.screenshot_interval_sec = 30;
        })
        .unwrap();
    let settings = config.current_settings();
    assert_eq!(settings.dedupe_threshold, 1);
    assert_eq!(settings.interval().as_secs(), 30);

    let reopened = ConfigManager::with_path(temp.path().join("config.json")).unwrap();
    assert_eq!(reopened.current_settings(), settings);
    assert_eq!(reopened.current_process(), "Editor.exe");
}
