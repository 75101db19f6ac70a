//! Unit tests for shell profile PATH configuration.

use super::*;
use rstest::{fixture, rstest};
use tempfile::TempDir;

struct Home {
    _temp: TempDir,
    path: Utf8PathBuf,
}

#[fixture]
fn home() -> Home {
    let temp = tempfile::tempdir().expect("temp dir");
    let path = Utf8PathBuf::try_from(temp.path().to_path_buf()).expect("utf8 temp path");
    Home { _temp: temp, path }
}

fn bin(home: &Home) -> Utf8PathBuf {
    home.path.join(".local/go/bin")
}

fn run_chain(chain: &[ProfileRung], bin_dir: &Utf8Path) -> (PathConfiguration, String, String) {
    let mut out = Vec::new();
    let mut err = Vec::new();
    let outcome = configure_path(chain, bin_dir, &mut Reporter::new(&mut out, &mut err));
    (
        outcome,
        String::from_utf8(out).expect("utf8"),
        String::from_utf8(err).expect("utf8"),
    )
}

#[rstest]
fn missing_profile_is_created(home: Home) {
    let profile = home.path.join(".profile");
    let update = append_path_export(&profile, &bin(&home)).expect("append");
    assert_eq!(update, ProfileUpdate::Created);
    assert_eq!(
        fs::read_to_string(&profile).expect("read"),
        format!("{}\n", export_line(&bin(&home)))
    );
}

#[rstest]
fn existing_profile_gets_line_appended(home: Home) {
    let profile = home.path.join(".profile");
    fs::write(&profile, "umask 022\n").expect("write");

    let update = append_path_export(&profile, &bin(&home)).expect("append");
    assert_eq!(update, ProfileUpdate::Appended);
    assert_eq!(
        fs::read_to_string(&profile).expect("read"),
        format!("umask 022\n\n{}\n", export_line(&bin(&home)))
    );
}

#[rstest]
fn second_run_is_idempotent(home: Home) {
    let profile = home.path.join(".profile");
    fs::write(&profile, "umask 022\n").expect("write");
    append_path_export(&profile, &bin(&home)).expect("first");
    let after_first = fs::read_to_string(&profile).expect("read");

    let update = append_path_export(&profile, &bin(&home)).expect("second");
    assert_eq!(update, ProfileUpdate::AlreadyPresent);
    assert_eq!(fs::read_to_string(&profile).expect("read"), after_first);
    assert_eq!(after_first.matches("export PATH=").count(), 1);
}

#[rstest]
fn any_mention_of_bin_dir_counts_as_present(home: Home) {
    let profile = home.path.join(".profile");
    let existing = format!("# managed elsewhere: {}/extra\n", bin(&home));
    fs::write(&profile, &existing).expect("write");

    let update = append_path_export(&profile, &bin(&home)).expect("append");
    assert_eq!(update, ProfileUpdate::AlreadyPresent);
    assert_eq!(fs::read_to_string(&profile).expect("read"), existing);
}

#[rstest]
fn profile_with_non_utf8_bytes_is_appended(home: Home) {
    let profile = home.path.join(".profile");
    fs::write(&profile, b"# caf\xe9 latin-1 comment\n").expect("write");

    let update = append_path_export(&profile, &bin(&home)).expect("append");
    assert_eq!(update, ProfileUpdate::Appended);
    let mut expected = b"# caf\xe9 latin-1 comment\n\n".to_vec();
    expected.extend_from_slice(export_line(&bin(&home)).as_bytes());
    expected.push(b'\n');
    assert_eq!(fs::read(&profile).expect("read"), expected);
}

#[rstest]
fn non_utf8_profile_mentioning_bin_dir_is_left_alone(home: Home) {
    let profile = home.path.join(".profile");
    let mut existing = b"# \xff\xfe\nPATH=".to_vec();
    existing.extend_from_slice(bin(&home).as_str().as_bytes());
    existing.push(b'\n');
    fs::write(&profile, &existing).expect("write");

    let update = append_path_export(&profile, &bin(&home)).expect("append");
    assert_eq!(update, ProfileUpdate::AlreadyPresent);
    assert_eq!(fs::read(&profile).expect("read"), existing);
}

#[rstest]
#[case::present(b"abc/go/bin:x", b"/go/bin", true)]
#[case::absent(b"abc/go/bi", b"/go/bin", false)]
#[case::short_haystack(b"go", b"/go/bin", false)]
#[case::empty_needle(b"anything", b"", true)]
fn byte_search(#[case] haystack: &[u8], #[case] needle: &[u8], #[case] expected: bool) {
    assert_eq!(contains_bytes(haystack, needle), expected);
}

#[rstest]
fn unreadable_profile_is_a_read_error(home: Home) {
    let profile = home.path.join(".profile");
    fs::create_dir(&profile).expect("directory in place of profile");
    let err = append_path_export(&profile, &bin(&home)).expect_err("directory");
    assert!(matches!(err, ProfileError::Read { .. }));
}

#[rstest]
fn profile_in_missing_directory_cannot_be_created(home: Home) {
    let profile = home.path.join("absent/.profile");
    let err = append_path_export(&profile, &bin(&home)).expect_err("no parent");
    assert!(matches!(err, ProfileError::Create { .. }));
}

#[rstest]
fn system_rung_requires_its_directory(home: Home) {
    let rung = ProfileRung::system_wide_in(&home.path.join("profile.d"));
    let err = rung.apply(&bin(&home)).expect_err("missing directory");
    assert!(matches!(err, ProfileError::MissingDirectory { .. }));
    assert!(err.to_string().contains("does not exist"));
}

#[test]
fn default_rungs_point_at_standard_profiles() {
    let system = ProfileRung::system_wide();
    assert_eq!(system.scope, ProfileScope::SystemWide);
    assert_eq!(system.profile.as_str(), "/etc/profile.d/go.sh");
    assert_eq!(
        system.required_dir.as_ref().map(|dir| dir.as_str()),
        Some("/etc/profile.d")
    );

    let user = ProfileRung::user(Utf8Path::new("/home/gopher"));
    assert_eq!(user.scope, ProfileScope::User);
    assert_eq!(user.profile.as_str(), "/home/gopher/.profile");
    assert_eq!(user.required_dir, None);
}

#[rstest]
#[case::system_wide(true, vec![ProfileScope::SystemWide, ProfileScope::User])]
#[case::user(false, vec![ProfileScope::User])]
fn chain_depends_on_root_mode(#[case] system_wide: bool, #[case] expected: Vec<ProfileScope>) {
    let chain = profile_chain(system_wide, Utf8Path::new("/home/gopher"));
    let scopes: Vec<ProfileScope> = chain.iter().map(|rung| rung.scope).collect();
    assert_eq!(scopes, expected);
}

#[rstest]
fn system_rung_success_prints_global_activation(home: Home) {
    let dir = home.path.join("profile.d");
    fs::create_dir(&dir).expect("create");
    let chain = [ProfileRung::system_wide_in(&dir), ProfileRung::user(&home.path)];

    let (outcome, out, err) = run_chain(&chain, &bin(&home));
    assert_eq!(
        outcome,
        PathConfiguration::Configured {
            scope: ProfileScope::SystemWide,
            profile: dir.join("go.sh"),
            update: ProfileUpdate::Created,
        }
    );
    assert!(err.is_empty());
    assert!(out.contains("Attempting to configure PATH globally..."));
    assert!(out.contains("To activate the global changes"));
    assert!(!home.path.join(".profile").exists(), "user rung is not reached");
}

#[rstest]
fn failed_system_rung_falls_back_to_user(home: Home) {
    let chain = [
        ProfileRung::system_wide_in(&home.path.join("missing-profile.d")),
        ProfileRung::user(&home.path),
    ];

    let (outcome, out, err) = run_chain(&chain, &bin(&home));
    assert!(matches!(
        outcome,
        PathConfiguration::Configured {
            scope: ProfileScope::User,
            update: ProfileUpdate::Created,
            ..
        }
    ));
    assert!(err.starts_with("Warning: directory"));
    assert!(out.contains("Falling back to user configuration..."));
    assert!(out.contains("To activate the changes for your user"));
    assert!(home.path.join(".profile").is_file());
}

#[rstest]
fn exhausted_chain_prints_manual_instructions(home: Home) {
    let chain = [ProfileRung::user(&home.path.join("no-such-home"))];

    let (outcome, out, err) = run_chain(&chain, &bin(&home));
    assert_eq!(outcome, PathConfiguration::Manual);
    assert!(err.starts_with("Warning: failed to create"));
    assert!(out.contains("Please manually add Go's bin directory to your PATH"));
    assert!(out.contains("Manual step required:"));
    assert!(out.contains(&export_line(&bin(&home))));
}

#[test]
fn activation_instructions_name_the_profile() {
    let text = activation_instructions(ProfileScope::User, Utf8Path::new("/home/gopher/.profile"));
    assert!(text.contains("2. Run: source /home/gopher/.profile"));
}
