use super::*;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

static TEST_ROOT_COUNTER: AtomicU64 = AtomicU64::new(0);

const INDEX_TEXT: &str = "P:musl\nV:1.2.5-r0\np:so:libc.musl-x86_64.so.1=1\n\nP:zlib\nV:1.3.1-r1\nD:so:libc.musl-x86_64.so.1\n\n";

#[test]
fn default_mirror_points_at_alpine_main_index() {
    let location = MirrorLocation::default();
    assert_eq!(
        location.index_url().expect("default location must be valid"),
        "https://dl-cdn.alpinelinux.org/alpine/v3.20/main/x86_64/APKINDEX.tar.gz"
    );
}

#[test]
fn mirror_url_trims_trailing_slashes() {
    let location = MirrorLocation {
        mirror: "https://mirror.example.test/alpine//".to_string(),
        release: "edge".to_string(),
        repository: "community".to_string(),
        arch: "aarch64".to_string(),
    };
    assert_eq!(
        location.index_url().expect("must build url"),
        "https://mirror.example.test/alpine/edge/community/aarch64/APKINDEX.tar.gz"
    );
}

#[test]
fn mirror_url_rejects_path_separator_in_segment() {
    let location = MirrorLocation {
        release: "v3.20/../../etc".to_string(),
        ..MirrorLocation::default()
    };
    let err = location.index_url().expect_err("must reject segment");
    assert!(err.to_string().contains("invalid mirror release"));
}

#[test]
fn mirror_url_rejects_empty_mirror() {
    let location = MirrorLocation {
        mirror: "  ".to_string(),
        ..MirrorLocation::default()
    };
    let err = location.index_url().expect_err("must reject empty mirror");
    assert!(err.to_string().contains("must not be empty"));
}

#[test]
fn mirror_location_fills_missing_fields_from_defaults() {
    let location: MirrorLocation =
        toml::from_str("release = \"edge\"\n").expect("partial location must deserialize");
    assert_eq!(location.release, "edge");
    assert_eq!(location.repository, "main");
    assert_eq!(location.arch, "x86_64");
}

#[test]
fn is_gzip_checks_magic_bytes() {
    assert!(is_gzip(&[0x1f, 0x8b, 0x08]));
    assert!(!is_gzip(b"P:musl\n"));
    assert!(!is_gzip(&[]));
}

#[test]
fn extract_apkindex_reads_signed_multi_member_archive() {
    let archive = signed_index_archive(INDEX_TEXT.as_bytes());

    let extracted = extract_apkindex(&archive).expect("must extract index");
    assert_eq!(extracted, INDEX_TEXT.as_bytes());
}

#[test]
fn extract_apkindex_fails_without_index_member() {
    let mut member = Vec::new();
    append_tar_entry(&mut member, "DESCRIPTION", b"v3.20.3\n");
    member.extend_from_slice(&[0_u8; 1024]);
    let archive = gzip(&member);

    let err = extract_apkindex(&archive).expect_err("must fail");
    assert!(err.to_string().contains("no APKINDEX member"));
}

#[test]
fn extract_apkindex_ignores_oversized_header_length() {
    let mut header = tar::Header::new_gnu();
    header.set_path(APKINDEX_MEMBER).expect("test entry path");
    header.set_size(1 << 40);
    header.set_mode(0o644);
    header.set_cksum();
    let mut member = header.as_bytes().to_vec();
    member.extend_from_slice(INDEX_TEXT.as_bytes());
    let archive = gzip(&member);

    // the declared size is not trusted; a truncated body is returned short or rejected
    if let Ok(contents) = extract_apkindex(&archive) {
        assert_eq!(contents, INDEX_TEXT.as_bytes());
    }
}

#[test]
fn extract_apkindex_rejects_garbage() {
    assert!(extract_apkindex(&[0x1f, 0x8b, 0x00, 0x01]).is_err());
}

#[test]
fn load_local_plain_index() {
    let root = test_root();
    fs::create_dir_all(&root).expect("must create test root");
    let path = root.join("APKINDEX");
    fs::write(&path, INDEX_TEXT).expect("must write index");

    let client = http_client().expect("client must build");
    let index =
        load_package_index(&client, &IndexSource::File(path)).expect("must load local index");
    assert_eq!(index.names(), vec!["musl", "zlib"]);

    let _ = fs::remove_dir_all(&root);
}

#[test]
fn load_local_archive_index() {
    let root = test_root();
    fs::create_dir_all(&root).expect("must create test root");
    let path = root.join("APKINDEX.tar.gz");
    fs::write(&path, signed_index_archive(INDEX_TEXT.as_bytes())).expect("must write archive");

    let client = http_client().expect("client must build");
    let raw = load_index_bytes(&client, &IndexSource::File(path)).expect("must load archive");
    assert_eq!(raw, INDEX_TEXT.as_bytes());

    let _ = fs::remove_dir_all(&root);
}

#[test]
fn load_local_index_reports_missing_file() {
    let path = test_root().join("missing-APKINDEX");
    let client = http_client().expect("client must build");

    let err = load_package_index(&client, &IndexSource::File(path.clone()))
        .expect_err("must fail for missing file");
    assert!(err
        .to_string()
        .contains(&format!("failed reading package index: {}", path.display())));
}

#[test]
fn load_local_index_reports_parse_error_context() {
    let root = test_root();
    fs::create_dir_all(&root).expect("must create test root");
    let path = root.join("APKINDEX");
    fs::write(&path, "P:musl\ngarbage\n").expect("must write index");

    let client = http_client().expect("client must build");
    let err = load_package_index(&client, &IndexSource::File(path.clone()))
        .expect_err("must fail to parse");
    assert!(err.to_string().contains("failed parsing package index"));
    assert!(format!("{err:#}").contains("malformed index line 2"));

    let _ = fs::remove_dir_all(&root);
}

#[test]
fn index_source_describes_location() {
    let mirror = IndexSource::Mirror(MirrorLocation::default());
    assert!(mirror.describe().ends_with("/v3.20/main/x86_64/APKINDEX.tar.gz"));

    let file = IndexSource::File(PathBuf::from("/tmp/APKINDEX"));
    assert_eq!(file.describe(), "/tmp/APKINDEX");
}

/// Builds an archive laid out like the ones Alpine publishes: a signature
/// stream without end-of-archive blocks followed by the index stream.
fn signed_index_archive(index: &[u8]) -> Vec<u8> {
    let mut signature = Vec::new();
    append_tar_entry(
        &mut signature,
        ".SIGN.RSA.alpine-devel@lists.alpinelinux.org-6165ee59.rsa.pub",
        b"not-a-real-signature",
    );

    let mut body = Vec::new();
    append_tar_entry(&mut body, "DESCRIPTION", b"v3.20.3-0-gabcdef\n");
    append_tar_entry(&mut body, APKINDEX_MEMBER, index);
    body.extend_from_slice(&[0_u8; 1024]);

    let mut archive = gzip(&signature);
    archive.extend(gzip(&body));
    archive
}

fn append_tar_entry(out: &mut Vec<u8>, path: &str, data: &[u8]) {
    let mut header = tar::Header::new_gnu();
    header.set_path(path).expect("test entry path");
    header.set_size(data.len() as u64);
    header.set_mode(0o644);
    header.set_cksum();
    out.extend_from_slice(header.as_bytes());
    out.extend_from_slice(data);
    let padding = (512 - data.len() % 512) % 512;
    out.extend(std::iter::repeat(0_u8).take(padding));
}

fn gzip(data: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).expect("gzip write");
    encoder.finish().expect("gzip finish")
}

fn test_root() -> PathBuf {
    let mut path = std::env::temp_dir();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time")
        .as_nanos();
    let counter = TEST_ROOT_COUNTER.fetch_add(1, Ordering::SeqCst);
    path.push(format!(
        "apkgraph-registry-tests-{}-{}-{}",
        std::process::id(),
        nanos,
        counter
    ));
    path
}
