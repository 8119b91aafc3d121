//! Foundation crate tests
//!
//! Tests cover:
//! - Error types (AppError variants)
//! - Session phase manager transitions
//! - Shutdown guard semantics

use vchat_foundation::error::AppError;
use vchat_foundation::shutdown::Shutdown;
use vchat_foundation::state::{PhaseManager, SessionPhase};

// ─── Error Type Tests ───────────────────────────────────────────────

#[test]
fn app_error_config_display() {
    let err = AppError::Config("missing asset root".to_string());
    let msg = format!("{}", err);
    assert!(msg.contains("missing asset root"));
}

#[test]
fn app_error_shutdown_display() {
    let err = AppError::ShutdownRequested;
    let msg = format!("{}", err);
    assert!(msg.contains("Shutdown"));
}

#[test]
fn app_error_fatal_display() {
    let err = AppError::Fatal("registry failed validation".to_string());
    let msg = format!("{}", err);
    assert!(msg.contains("registry failed validation"));
}

// ─── Session Phase Tests ────────────────────────────────────────────

#[test]
fn phase_manager_starts_connecting() {
    let phases = PhaseManager::new();
    assert_eq!(phases.current(), SessionPhase::Connecting);
}

#[test]
fn phase_manager_full_lifecycle() {
    let phases = PhaseManager::new();
    phases.transition(SessionPhase::Live).unwrap();
    phases.transition(SessionPhase::Stopping).unwrap();
    phases.transition(SessionPhase::Ended).unwrap();
    assert_eq!(phases.current(), SessionPhase::Ended);
}

#[test]
fn phase_manager_rejects_skipping_live_to_ended() {
    let phases = PhaseManager::new();
    phases.transition(SessionPhase::Live).unwrap();
    let result = phases.transition(SessionPhase::Ended);
    assert!(matches!(result, Err(AppError::Fatal(_))));
    assert_eq!(phases.current(), SessionPhase::Live);
}

#[test]
fn phase_manager_allows_abort_before_live() {
    let phases = PhaseManager::new();
    phases.transition(SessionPhase::Stopping).unwrap();
    phases.transition(SessionPhase::Ended).unwrap();
    assert_eq!(phases.current(), SessionPhase::Ended);
}

#[test]
fn phase_manager_subscribers_see_transitions() {
    let phases = PhaseManager::new();
    let rx = phases.subscribe();
    phases.transition(SessionPhase::Live).unwrap();
    phases.transition(SessionPhase::Stopping).unwrap();
    assert_eq!(rx.recv().unwrap(), SessionPhase::Live);
    assert_eq!(rx.recv().unwrap(), SessionPhase::Stopping);
}

// ─── Shutdown Tests ─────────────────────────────────────────────────

#[tokio::test]
async fn shutdown_wait_returns_after_trigger() {
    let shutdown = Shutdown::new();
    assert!(!shutdown.is_triggered());
    shutdown.trigger();
    assert!(shutdown.is_triggered());
    // Must not hang when already triggered.
    shutdown.wait().await;
}

#[tokio::test]
async fn shutdown_wakes_pending_waiter() {
    let shutdown = Shutdown::new();
    let waiter = shutdown.clone();
    let handle = tokio::spawn(async move { waiter.wait().await });
    tokio::task::yield_now().await;
    shutdown.trigger();
    handle.await.unwrap();
}
