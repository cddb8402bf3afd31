use fxinject::bootstrap::create_container;
use fxinject::component::Injected;
use fxinject::{scan, Component};

#[derive(Component)]
#[component(names = ["audit_log"])]
struct AuditLog;

#[derive(Component)]
struct ZReportService {
    // a late-bound field - empty after construction, wired once every component of the scan
    // exists, so injection does not depend on discovery order
    #[component(inject)]
    audit_log: Injected<AuditLog>,
    // the same, but resolved by qualifier name
    #[component(inject, qualifier = "audit_log")]
    named_audit_log: Injected<AuditLog>,
    // not injected at all
    #[component(default)]
    report_count: u32,
}

// note: for the sake of simplicity, errors are unwrapped, rather than gracefully handled
fn main() {
    let container = create_container();
    scan!(container).unwrap();

    // ZReportService sorts after AuditLog, but even the reverse order would wire fine, since
    // field injection runs as a separate second phase
    let service = container.get_component::<ZReportService>().unwrap();
    assert!(service.audit_log.is_wired());
    assert!(service.named_audit_log.is_wired());
    println!("reports so far: {}", service.report_count);
}
