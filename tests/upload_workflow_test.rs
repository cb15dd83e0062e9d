mod common;

use image::{DynamicImage, ImageFormat, RgbImage};
use std::io::Cursor;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use common::{test_config, FakeAuth, RecordingTransport};
use homework_portal::models::UploadFile;
use homework_portal::workflow::{Stage, StageWizard, WizardAction};
use homework_portal::{App, Config};

fn jpeg(width: u32, height: u32) -> Vec<u8> {
    let image = DynamicImage::ImageRgb8(RgbImage::new(width, height));
    let mut buf = Cursor::new(Vec::new());
    image.write_to(&mut buf, ImageFormat::Jpeg).unwrap();
    buf.into_inner()
}

fn app(config: Config) -> App {
    App::with_parts(config, Arc::new(RecordingTransport::new()), FakeAuth::signed_out())
}

#[tokio::test]
async fn test_valid_and_oversized_file() {
    let app = app(test_config());
    let mut workflow = app.upload_workflow();

    let files = vec![
        UploadFile::new("a.jpg", "image/jpeg", jpeg(800, 600)),
        UploadFile::new("b.jpg", "image/jpeg", vec![0u8; 11 * 1024 * 1024]),
    ];
    let report = workflow
        .add_files(files, None, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(workflow.groups().len(), 1);
    let group = workflow.active_group().unwrap();
    assert_eq!(Some(&group.id), report.group_id.as_ref());
    assert_eq!(group.sheet_count(), 1);

    let thumbnail = &group.sheets[0].thumbnail;
    assert_eq!((thumbnail.width, thumbnail.height), (400, 300));

    assert_eq!(report.rejected.len(), 1);
    assert_eq!(report.rejected[0].0, "b.jpg");
    assert!(workflow.error_message().unwrap().contains("10MB"));

    app.shutdown().await;
}

#[tokio::test]
async fn test_configured_thumbnail_width() {
    let config = Config {
        thumbnail_max_width: 100,
        ..test_config()
    };
    let app = app(config);
    let mut workflow = app.upload_workflow();

    workflow
        .add_files(
            vec![UploadFile::new("wide.jpg", "image/jpeg", jpeg(500, 250))],
            None,
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    let thumbnail = &workflow.groups()[0].sheets[0].thumbnail;
    assert_eq!((thumbnail.width, thumbnail.height), (100, 50));

    app.shutdown().await;
}

#[tokio::test]
async fn test_scan_reads_local_files() {
    let dir = std::env::temp_dir().join(format!("homework-portal-{}", uuid::Uuid::new_v4()));
    tokio::fs::create_dir_all(&dir).await.unwrap();
    let page = dir.join("page1.jpg");
    let notes = dir.join("notes.txt");
    tokio::fs::write(&page, jpeg(64, 32)).await.unwrap();
    tokio::fs::write(&notes, b"not an image").await.unwrap();

    let app = app(test_config());
    let workflow = app.scan(&[page, notes]).await.unwrap();

    assert_eq!(workflow.groups().len(), 1);
    assert_eq!(workflow.groups()[0].sheets[0].file.name, "page1.jpg");
    assert_eq!(workflow.errors().len(), 1);

    app.shutdown().await;
    let _ = tokio::fs::remove_dir_all(&dir).await;
}

#[tokio::test]
async fn test_scan_reports_unreadable_paths() {
    let dir = std::env::temp_dir().join(format!("homework-portal-{}", uuid::Uuid::new_v4()));
    tokio::fs::create_dir_all(&dir).await.unwrap();
    let page = dir.join("page1.jpg");
    let missing = dir.join("missing.jpg");
    tokio::fs::write(&page, jpeg(64, 32)).await.unwrap();

    let app = app(test_config());
    let workflow = app.scan(&[missing.clone(), page]).await.unwrap();

    assert_eq!(workflow.groups().len(), 1);
    assert_eq!(workflow.groups()[0].sheet_count(), 1);
    assert_eq!(workflow.errors().len(), 1);
    assert_eq!(
        workflow.error_message(),
        Some(format!("{} could not be read.", missing.display()).as_str())
    );

    app.shutdown().await;
    let _ = tokio::fs::remove_dir_all(&dir).await;
}

#[test]
fn test_wizard_walkthrough() {
    let mut wizard = StageWizard::new();
    assert_eq!(wizard.available_actions(), &[WizardAction::Next]);

    wizard.next().unwrap();
    wizard.submit().unwrap();
    assert_eq!(wizard.stage(), Stage::Result);
    assert_eq!(wizard.available_actions(), &[WizardAction::Back]);
    assert_eq!(wizard.index(), 2);
}
