mod support;

use bunkmate::app_dirs;
use bunkmate::caption::settings;
use support::env::BunkmateEnvGuard;

#[test]
fn settings_file_is_picked_up_from_config_home() {
    let temp = tempfile::tempdir().expect("create tempdir");
    let _guard = BunkmateEnvGuard::set_config_home(temp.path().to_path_buf());

    let dir = temp.path().join(app_dirs::APP_DIR_NAME);
    std::fs::create_dir_all(&dir).expect("create app dir");
    std::fs::write(
        dir.join(settings::SETTINGS_FILE_NAME),
        "api_key = \"file-key\"\nmodel = \"gemini-2.0-flash\"\n",
    )
    .expect("write settings");

    let resolved = settings::load_or_default().expect("load settings");
    assert_eq!(resolved.api_key.as_deref(), Some("file-key"));
    assert_eq!(resolved.model, "gemini-2.0-flash");
    assert_eq!(
        resolved.endpoint,
        "https://generativelanguage.googleapis.com"
    );
}

#[test]
fn missing_settings_file_yields_defaults() {
    let temp = tempfile::tempdir().expect("create tempdir");
    let _guard = BunkmateEnvGuard::set_config_home(temp.path().to_path_buf());

    let resolved = settings::load_or_default().expect("load settings");
    assert_eq!(resolved.api_key, None);
    assert_eq!(resolved.model, "gemini-2.5-flash");
}
