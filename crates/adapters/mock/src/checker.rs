//! Sample fault checker.

use monika_domain::fault::{FaultCandidate, Severity};
use monika_domain::update::IoletUpdate;

/// Flags every iolet that is not running.
#[must_use]
pub fn iolet_stopped_checker(iolet: &IoletUpdate) -> Option<FaultCandidate> {
    if iolet.status.running() {
        return None;
    }
    Some(FaultCandidate::new(
        Severity::HIGHEST,
        format!("IOlet {} stopped!", iolet.name),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use monika_domain::kind::IoletType;
    use monika_domain::status::IoletStatus;

    fn iolet(status: IoletStatus) -> IoletUpdate {
        IoletUpdate {
            id: "1".into(),
            kind: IoletType::IpVideoIn,
            name: "Video Input 1".to_string(),
            status,
        }
    }

    #[test]
    fn should_flag_stopped_iolet() {
        let candidate = iolet_stopped_checker(&iolet(IoletStatus::RECEIVING)).unwrap();
        assert_eq!(candidate.severity, Severity::HIGHEST);
        assert_eq!(candidate.message, "IOlet Video Input 1 stopped!");
    }

    #[test]
    fn should_pass_running_iolet() {
        assert!(iolet_stopped_checker(&iolet(IoletStatus::RUNNING)).is_none());
    }
}
