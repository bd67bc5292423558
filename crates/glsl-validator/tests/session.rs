mod common;

use common::{Behavior, DOC, Enabled, FakeValidator, GLSL_SYNTAX, RecordingHost};
use glsl_validator::{
    Dispatch, DocumentSnapshot, PERMISSION_DENIED_MESSAGE, SessionState, SkipReason,
    ValidationEvent, ValidationPipeline, ValidationSession,
};
use glsl_validator_core::{Diagnostic, DiagnosticRange, UNSUPPORTED_SUFFIX_STATUS};
use pretty_assertions::assert_eq;
use std::sync::Arc;

const PATH: &str = "shaders/blur.frag";

fn snapshot(path: &str) -> DocumentSnapshot {
    DocumentSnapshot::new(path, DOC).with_syntax(GLSL_SYNTAX)
}

fn setup(lines: &[&str]) -> (Arc<FakeValidator>, ValidationPipeline) {
    let validator = Arc::new(FakeValidator::with_output(lines));
    let pipeline = ValidationPipeline::new(validator.clone()).unwrap();
    (validator, pipeline)
}

fn foo_diagnostic() -> Diagnostic {
    Diagnostic::new(DiagnosticRange::new(16, 19), "undeclared identifier")
}

#[test]
fn test_validation_pass_stores_and_pushes_diagnostics() {
    let (validator, pipeline) = setup(&[
        "shaders/blur.frag",
        "ERROR: 0:2: 'foo' : undeclared identifier",
        "ERROR: 0:2: '' : syntax error",
        "ERROR: 2 compilation errors.  No code generated.",
    ]);
    let mut session = ValidationSession::new(PATH);
    let mut host = RecordingHost::default();

    let skipped = session.validate_now(
        ValidationEvent::Opened,
        &snapshot(PATH),
        &Enabled(true),
        &pipeline,
        &mut host,
    );

    assert_eq!(skipped, None);
    assert_eq!(validator.calls(), 1);
    assert_eq!(session.state(), SessionState::Idle);
    assert_eq!(
        session.diagnostics(),
        &[
            foo_diagnostic(),
            Diagnostic::new(DiagnosticRange::new(14, 26), "syntax error"),
        ]
    );
    assert_eq!(
        host.regions_for(PATH),
        Some(&[DiagnosticRange::new(16, 19), DiagnosticRange::new(14, 26)][..])
    );
    assert_eq!(host.region_pushes, 1);
    assert!(host.errors.is_empty());
}

#[test]
fn test_out_of_range_finding_is_dropped_from_the_set() {
    let (_validator, pipeline) = setup(&[
        "ERROR: 0:99: 'x' : bad",
        "ERROR: 0:2: 'foo' : undeclared identifier",
    ]);
    let mut session = ValidationSession::new(PATH);
    let mut host = RecordingHost::default();

    session.validate_now(
        ValidationEvent::Saved,
        &snapshot(PATH),
        &Enabled(true),
        &pipeline,
        &mut host,
    );

    assert_eq!(session.diagnostics(), &[foo_diagnostic()]);
}

#[test]
fn test_disabled_clears_diagnostics_without_running() {
    let (validator, pipeline) = setup(&["ERROR: 0:2: 'foo' : undeclared identifier"]);
    let mut session = ValidationSession::new(PATH);
    let mut host = RecordingHost::default();

    session.validate_now(
        ValidationEvent::Opened,
        &snapshot(PATH),
        &Enabled(true),
        &pipeline,
        &mut host,
    );
    assert_eq!(session.diagnostics().len(), 1);

    let skipped = session.validate_now(
        ValidationEvent::Activated,
        &snapshot(PATH),
        &Enabled(false),
        &pipeline,
        &mut host,
    );

    assert_eq!(skipped, Some(SkipReason::Disabled));
    assert_eq!(validator.calls(), 1);
    assert!(session.diagnostics().is_empty());
    assert_eq!(host.regions_for(PATH), Some(&[][..]));
}

#[test]
fn test_non_glsl_syntax_leaves_diagnostics_untouched() {
    let (validator, pipeline) = setup(&["ERROR: 0:2: 'foo' : undeclared identifier"]);
    let mut session = ValidationSession::new(PATH);
    let mut host = RecordingHost::default();

    session.validate_now(
        ValidationEvent::Opened,
        &snapshot(PATH),
        &Enabled(true),
        &pipeline,
        &mut host,
    );
    let pushes = host.region_pushes;

    let plain = DocumentSnapshot::new(PATH, DOC).with_syntax("Packages/Text/Plain text.tmLanguage");
    let skipped = session.validate_now(
        ValidationEvent::Activated,
        &plain,
        &Enabled(true),
        &pipeline,
        &mut host,
    );

    assert_eq!(skipped, Some(SkipReason::NotGlsl));
    assert_eq!(validator.calls(), 1);
    assert_eq!(session.diagnostics(), &[foo_diagnostic()]);
    assert_eq!(host.region_pushes, pushes);

    let no_syntax = DocumentSnapshot::new(PATH, DOC);
    assert_eq!(
        session.validate_now(
            ValidationEvent::Saved,
            &no_syntax,
            &Enabled(true),
            &pipeline,
            &mut host,
        ),
        Some(SkipReason::NotGlsl)
    );
}

#[test]
fn test_unsupported_suffix_clears_and_reports_status() {
    let (validator, pipeline) = setup(&["ERROR: 0:2: 'foo' : undeclared identifier"]);
    let path = "shaders/common.glsl";
    let mut session = ValidationSession::new(path);
    let mut host = RecordingHost::default();

    let skipped = session.validate_now(
        ValidationEvent::Opened,
        &snapshot(path),
        &Enabled(true),
        &pipeline,
        &mut host,
    );

    assert_eq!(skipped, Some(SkipReason::UnsupportedSuffix));
    assert_eq!(validator.calls(), 0);
    assert!(session.diagnostics().is_empty());
    assert_eq!(host.status_for(path), Some(UNSUPPORTED_SUFFIX_STATUS));
    assert_eq!(host.regions_for(path), Some(&[][..]));
}

#[test]
fn test_trigger_erases_previous_status() {
    let (_validator, pipeline) = setup(&[]);
    let mut session = ValidationSession::new(PATH);
    let mut host = RecordingHost::default();
    host.status
        .insert(PATH.into(), "undeclared identifier".to_string());

    session.validate_now(
        ValidationEvent::Saved,
        &snapshot(PATH),
        &Enabled(true),
        &pipeline,
        &mut host,
    );

    assert_eq!(host.status_for(PATH), None);
}

#[test]
fn test_permission_denied_notifies_and_empties_diagnostics() {
    let (validator, pipeline) = setup(&["ERROR: 0:2: 'foo' : undeclared identifier"]);
    let mut session = ValidationSession::new(PATH);
    let mut host = RecordingHost::default();

    session.validate_now(
        ValidationEvent::Opened,
        &snapshot(PATH),
        &Enabled(true),
        &pipeline,
        &mut host,
    );
    assert_eq!(session.diagnostics().len(), 1);

    validator.set_behavior(Behavior::PermissionDenied);
    session.validate_now(
        ValidationEvent::Saved,
        &snapshot(PATH),
        &Enabled(true),
        &pipeline,
        &mut host,
    );

    assert_eq!(host.errors, vec![PERMISSION_DENIED_MESSAGE.to_string()]);
    assert!(session.diagnostics().is_empty());
    assert_eq!(host.regions_for(PATH), Some(&[][..]));
    assert_eq!(session.state(), SessionState::Idle);
}

#[test]
fn test_process_failure_reports_status() {
    let validator = Arc::new(FakeValidator::new(Behavior::Timeout));
    let pipeline = ValidationPipeline::new(validator.clone()).unwrap();
    let mut session = ValidationSession::new(PATH);
    let mut host = RecordingHost::default();

    session.validate_now(
        ValidationEvent::Opened,
        &snapshot(PATH),
        &Enabled(true),
        &pipeline,
        &mut host,
    );

    assert!(host.errors.is_empty());
    assert!(session.diagnostics().is_empty());
    let status = host.status_for(PATH).unwrap();
    assert!(status.starts_with("GLSLValidator: "), "{status}");
    assert!(status.contains("did not finish"), "{status}");
}

#[test]
fn test_newer_trigger_supersedes_outstanding_job() {
    let (_validator, pipeline) = setup(&["ERROR: 0:2: 'foo' : undeclared identifier"]);
    let mut session = ValidationSession::new(PATH);
    let mut host = RecordingHost::default();
    let settings = Enabled(true);

    let first = session
        .handle_event(ValidationEvent::Opened, &snapshot(PATH), &settings, &mut host)
        .into_job()
        .unwrap();
    let second = session
        .handle_event(ValidationEvent::Saved, &snapshot(PATH), &settings, &mut host)
        .into_job()
        .unwrap();
    assert_eq!(
        session.state(),
        SessionState::Running {
            generation: second.generation
        }
    );

    // The stale result arrives first and is ignored.
    let first_outcome = pipeline.run(first);
    assert!(!session.complete(first_outcome, &mut host));
    assert!(session.diagnostics().is_empty());
    assert_eq!(host.region_pushes, 0);

    assert!(session.complete(pipeline.run(second), &mut host));
    assert_eq!(session.diagnostics(), &[foo_diagnostic()]);
    assert_eq!(host.region_pushes, 1);
    assert_eq!(session.state(), SessionState::Idle);
}

#[test]
fn test_stale_result_arriving_late_is_ignored() {
    let (validator, pipeline) = setup(&["ERROR: 0:2: 'foo' : undeclared identifier"]);
    let mut session = ValidationSession::new(PATH);
    let mut host = RecordingHost::default();
    let settings = Enabled(true);

    let first = session
        .handle_event(ValidationEvent::Opened, &snapshot(PATH), &settings, &mut host)
        .into_job()
        .unwrap();
    let first_outcome = pipeline.run(first);

    validator.set_behavior(Behavior::Output(Vec::new()));
    let second = session
        .handle_event(ValidationEvent::Saved, &snapshot(PATH), &settings, &mut host)
        .into_job()
        .unwrap();
    assert!(session.complete(pipeline.run(second), &mut host));
    assert!(session.diagnostics().is_empty());

    assert!(!session.complete(first_outcome, &mut host));
    assert!(session.diagnostics().is_empty());
}

#[test]
fn test_disabling_while_running_drops_the_outcome() {
    let (_validator, pipeline) = setup(&["ERROR: 0:2: 'foo' : undeclared identifier"]);
    let mut session = ValidationSession::new(PATH);
    let mut host = RecordingHost::default();

    let job = session
        .handle_event(
            ValidationEvent::Opened,
            &snapshot(PATH),
            &Enabled(true),
            &mut host,
        )
        .into_job()
        .unwrap();
    let dispatch = session.handle_event(
        ValidationEvent::Activated,
        &snapshot(PATH),
        &Enabled(false),
        &mut host,
    );
    assert!(matches!(dispatch, Dispatch::Skipped(SkipReason::Disabled)));

    assert!(!session.complete(pipeline.run(job), &mut host));
    assert!(session.diagnostics().is_empty());
}

#[test]
fn test_rerun_is_idempotent() {
    let (_validator, pipeline) = setup(&[
        "ERROR: 0:2: 'foo' : undeclared identifier",
        "ERROR: 0:3: '' : unexpected end",
    ]);
    let mut session = ValidationSession::new(PATH);
    let mut host = RecordingHost::default();

    session.validate_now(
        ValidationEvent::Opened,
        &snapshot(PATH),
        &Enabled(true),
        &pipeline,
        &mut host,
    );
    let first = session.diagnostics().to_vec();

    session.validate_now(
        ValidationEvent::Saved,
        &snapshot(PATH),
        &Enabled(true),
        &pipeline,
        &mut host,
    );

    assert_eq!(session.diagnostics(), first.as_slice());
}

#[test]
fn test_diagnostic_at_returns_first_containing() {
    let (_validator, pipeline) = setup(&[
        "ERROR: 0:2: 'foo' : undeclared identifier",
        "ERROR: 0:2: '' : syntax error",
    ]);
    let mut session = ValidationSession::new(PATH);
    let mut host = RecordingHost::default();
    session.validate_now(
        ValidationEvent::Opened,
        &snapshot(PATH),
        &Enabled(true),
        &pipeline,
        &mut host,
    );

    // Inside both regions: stored order wins.
    assert_eq!(
        session.diagnostic_at(17).map(|d| d.message.as_str()),
        Some("undeclared identifier")
    );
    // Only the whole-line region.
    assert_eq!(
        session.diagnostic_at(22).map(|d| d.message.as_str()),
        Some("syntax error")
    );
    // Caret right after the token still belongs to it.
    assert_eq!(
        session.diagnostic_at(19).map(|d| d.message.as_str()),
        Some("undeclared identifier")
    );
    assert_eq!(session.diagnostic_at(2), None);
    assert_eq!(session.diagnostic_at(1000), None);
}

#[test]
fn test_report_status_follows_selection() {
    let (_validator, pipeline) = setup(&["ERROR: 0:2: 'foo' : undeclared identifier"]);
    let mut session = ValidationSession::new(PATH);
    let mut host = RecordingHost::default();
    session.validate_now(
        ValidationEvent::Opened,
        &snapshot(PATH),
        &Enabled(true),
        &pipeline,
        &mut host,
    );

    session.report_status(&[DiagnosticRange::caret(17)], &mut host);
    assert_eq!(host.status_for(PATH), Some("undeclared identifier"));

    session.report_status(&[DiagnosticRange::caret(2)], &mut host);
    assert_eq!(host.status_for(PATH), None);

    // Any of several selections may match.
    session.report_status(
        &[DiagnosticRange::caret(2), DiagnosticRange::new(16, 19)],
        &mut host,
    );
    assert_eq!(host.status_for(PATH), Some("undeclared identifier"));

    // A selection reaching outside the region does not match.
    session.report_status(&[DiagnosticRange::new(15, 19)], &mut host);
    assert_eq!(host.status_for(PATH), None);
}

#[test]
fn test_report_status_ignores_non_glsl_documents() {
    let (_validator, pipeline) = setup(&["ERROR: 0:2: 'foo' : undeclared identifier"]);
    let mut session = ValidationSession::new(PATH);
    let mut host = RecordingHost::default();
    session.validate_now(
        ValidationEvent::Opened,
        &snapshot(PATH),
        &Enabled(true),
        &pipeline,
        &mut host,
    );

    // The syntax changed to something else; the stored diagnostics stay but are not shown.
    session.validate_now(
        ValidationEvent::Activated,
        &DocumentSnapshot::new(PATH, DOC).with_syntax("Packages/C++/C.sublime-syntax"),
        &Enabled(true),
        &pipeline,
        &mut host,
    );
    assert_eq!(session.diagnostics().len(), 1);

    session.report_status(&[DiagnosticRange::caret(17)], &mut host);
    assert_eq!(host.status_for(PATH), None);
}
