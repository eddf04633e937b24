mod common;

use std::time::Duration;

use tokio::time::Instant;

use common::{archive_entries, order, FakeSite, ALWAYS};
use robot_order_bot::models::parse_orders;
use robot_order_bot::services::{resolve_catalog, FormDriver};
use robot_order_bot::{
    run_pipeline, AppError, Catalog, Config, FailedStage, OrderCtx, OrderState, OutputLayout,
};

fn config_with_attempts(dir: &std::path::Path, attempts: usize) -> Config {
    Config {
        output_dir: dir.to_path_buf(),
        max_submission_attempts: attempts,
        submission_retry_delay: Duration::ZERO,
        ..Default::default()
    }
}

#[tokio::test]
async fn test_transient_error_is_retried_and_all_orders_archived() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_with_attempts(dir.path(), 2);
    let layout = OutputLayout::new(dir.path());
    let orders = vec![order(1, 1), order(2, 3), order(3, 6)];
    let mut site = FakeSite::new().failing(2, 1);

    let report = run_pipeline(&mut site, &orders, &config, &layout).await.unwrap();

    assert_eq!(report.total(), 3);
    assert_eq!(report.failed().count(), 0);
    assert!(report.outcomes.iter().all(|o| o.state == OrderState::Archived));
    assert_eq!(report.outcomes[1].attempts, 2);
    assert_eq!(site.submit_calls[&2], 2);
    assert_eq!(
        archive_entries(&layout.archive()),
        vec![
            "receipt_with_screenshot_1.pdf",
            "receipt_with_screenshot_2.pdf",
            "receipt_with_screenshot_3.pdf",
        ]
    );
}

#[tokio::test]
async fn test_permanent_failure_is_reported_and_omitted_from_archive() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_with_attempts(dir.path(), 3);
    let layout = OutputLayout::new(dir.path());
    let orders = vec![order(1, 2), order(2, 4)];
    let mut site = FakeSite::new().failing(1, ALWAYS);

    let report = run_pipeline(&mut site, &orders, &config, &layout).await.unwrap();

    let failed: Vec<_> = report.failed().collect();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].order_number, 1);
    assert_eq!(failed[0].attempts, 3);
    assert!(matches!(
        failed[0].state,
        OrderState::Failed {
            stage: FailedStage::Submission,
            ..
        }
    ));
    assert_eq!(site.submit_calls[&1], 3);

    assert!(!layout.receipt_pdf(1).exists());
    assert!(!layout.preview_image(1).exists());
    assert_eq!(
        archive_entries(&layout.archive()),
        vec!["receipt_with_screenshot_2.pdf"]
    );

    let failure_log = std::fs::read_to_string(layout.failure_log()).unwrap();
    assert!(failure_log.contains("订单 1"));
    assert!(!failure_log.contains("订单 2"));
}

#[tokio::test]
async fn test_first_attempt_success_exports_one_receipt_and_one_image() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_with_attempts(dir.path(), 5);
    let layout = OutputLayout::new(dir.path());
    let mut site = FakeSite::new();

    let report = run_pipeline(&mut site, &[order(7, 5)], &config, &layout).await.unwrap();

    let outcome = &report.outcomes[0];
    assert_eq!(outcome.attempts, 1);
    let exported = outcome.exported.as_ref().unwrap();
    assert_eq!(exported.receipt_pdf, layout.receipt_pdf(7));
    assert_eq!(exported.preview_image, layout.preview_image(7));

    let count_files = |p: std::path::PathBuf| std::fs::read_dir(p).unwrap().count();
    assert_eq!(count_files(layout.receipts_dir()), 1);
    assert_eq!(count_files(layout.images_dir()), 1);
    assert_eq!(count_files(layout.pdfs_dir()), 1);

    let merged = lopdf::Document::load(layout.merged_pdf(7)).unwrap();
    assert_eq!(merged.get_pages().len(), 2);
}

#[tokio::test]
async fn test_unavailable_catalog_aborts_before_any_order() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_with_attempts(dir.path(), 5);
    let layout = OutputLayout::new(dir.path());
    let mut site = FakeSite::new();
    site.model_rows.clear();

    let result = run_pipeline(&mut site, &[order(1, 1)], &config, &layout).await;

    match result {
        Err(e @ AppError::CatalogUnavailable(_)) => assert!(e.is_fatal()),
        other => panic!("期望目录不可用错误, 实际: {:?}", other.map(|r| r.total())),
    }
    assert_eq!(site.total_submits(), 0);
    assert!(!layout.archive().exists());
}

#[tokio::test]
async fn test_unknown_head_part_fails_only_that_order() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_with_attempts(dir.path(), 5);
    let layout = OutputLayout::new(dir.path());
    let mut site = FakeSite::new();

    let report = run_pipeline(&mut site, &[order(1, 99), order(2, 1)], &config, &layout)
        .await
        .unwrap();

    assert!(matches!(
        report.outcomes[0].state,
        OrderState::Failed {
            stage: FailedStage::Submission,
            ..
        }
    ));
    assert_eq!(report.outcomes[0].attempts, 0);
    assert!(!site.submit_calls.contains_key(&1));
    assert_eq!(report.outcomes[1].state, OrderState::Archived);
}

#[tokio::test]
async fn test_missing_receipt_element_is_export_failure() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_with_attempts(dir.path(), 5);
    let layout = OutputLayout::new(dir.path());
    let mut site = FakeSite::new().without_receipt(1);

    let report = run_pipeline(&mut site, &[order(1, 1), order(2, 2)], &config, &layout)
        .await
        .unwrap();

    assert!(matches!(
        report.outcomes[0].state,
        OrderState::Failed {
            stage: FailedStage::Export,
            ..
        }
    ));
    assert!(!layout.receipt_pdf(1).exists());
    assert_eq!(
        archive_entries(&layout.archive()),
        vec!["receipt_with_screenshot_2.pdf"]
    );
}

#[tokio::test]
async fn test_each_order_starts_from_a_fresh_page() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_with_attempts(dir.path(), 2);
    let layout = OutputLayout::new(dir.path());
    let mut site = FakeSite::new().failing(1, ALWAYS);

    run_pipeline(&mut site, &[order(1, 1), order(2, 2), order(3, 3)], &config, &layout)
        .await
        .unwrap();

    // 目录表一次 + 每个订单一次
    assert_eq!(site.open_calls, 4);
}

#[tokio::test]
async fn test_catalog_resolution_is_idempotent() {
    let mut site = FakeSite::new();

    let first = resolve_catalog(&mut site).await.unwrap();
    let second = resolve_catalog(&mut site).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(first.len(), 6);
    assert_eq!(first.name_of(3), Some("D.A.V.E"));
}

#[tokio::test]
async fn test_outcomes_follow_csv_row_order() {
    let csv = "Order number,Head,Body,Legs,Address\n\
               12,1,1,1,A\n\
               4,2,2,2,B\n\
               9,3,3,3,C\n\
               1,4,4,4,D\n";
    let orders = parse_orders(csv.as_bytes()).unwrap();
    assert_eq!(orders.len(), 4);

    let dir = tempfile::tempdir().unwrap();
    let config = config_with_attempts(dir.path(), 1);
    let layout = OutputLayout::new(dir.path());
    let mut site = FakeSite::new();

    let report = run_pipeline(&mut site, &orders, &config, &layout).await.unwrap();

    let numbers: Vec<u32> = report.outcomes.iter().map(|o| o.order_number).collect();
    assert_eq!(numbers, vec![12, 4, 9, 1]);
    assert_eq!(report.archive.entries.len(), 4);
}

#[tokio::test(start_paused = true)]
async fn test_retry_delay_is_waited_between_attempts() {
    let delay = Duration::from_millis(200);
    let driver = FormDriver::new(3, delay);
    let catalog = Catalog::from_rows(&common::standard_model_rows()).unwrap();
    let mut site = FakeSite::new().failing(1, ALWAYS);
    let record = order(1, 1);
    let ctx = OrderCtx::new(1, 1, 1);
    driver.fill(&mut site, &record, &catalog, &ctx).await.unwrap();

    let started = Instant::now();
    let result = driver.submit_until_success(&mut site, &ctx).await;
    let elapsed = started.elapsed();

    assert!(matches!(result, Err(AppError::Submission { attempts: 3, .. })));
    // 三次尝试之间等待两次，最后一次失败后不再等待
    assert!(elapsed >= delay * 2, "实际等待 {:?}", elapsed);
    assert!(elapsed < delay * 3, "实际等待 {:?}", elapsed);
}

#[tokio::test]
async fn test_submit_errors_are_retried_like_rejections() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_with_attempts(dir.path(), 3);
    let layout = OutputLayout::new(dir.path());
    let mut site = FakeSite::new().erroring(1, 2);

    let report = run_pipeline(&mut site, &[order(1, 2)], &config, &layout).await.unwrap();

    assert_eq!(report.outcomes[0].state, OrderState::Archived);
    assert_eq!(report.outcomes[0].attempts, 3);
    assert_eq!(site.submit_calls[&1], 3);
}

#[tokio::test]
async fn test_composition_failure_does_not_block_later_orders() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_with_attempts(dir.path(), 2);
    let layout = OutputLayout::new(dir.path());
    let mut site = FakeSite::new().with_broken_preview(1);

    let report = run_pipeline(&mut site, &[order(1, 1), order(2, 2)], &config, &layout)
        .await
        .unwrap();

    assert!(matches!(
        report.outcomes[0].state,
        OrderState::Failed {
            stage: FailedStage::Composition,
            ..
        }
    ));
    assert!(layout.receipt_pdf(1).exists());
    assert!(!layout.merged_pdf(1).exists());
    assert_eq!(report.outcomes[1].state, OrderState::Archived);
    assert_eq!(
        archive_entries(&layout.archive()),
        vec!["receipt_with_screenshot_2.pdf"]
    );

    let failure_log = std::fs::read_to_string(layout.failure_log()).unwrap();
    assert!(failure_log.contains("订单 1"));
    assert!(failure_log.contains("合成"));
}
