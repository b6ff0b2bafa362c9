//! Static flow diagrams for orchestrations
//!
//! These Mermaid diagrams describe the expected flow of each orchestration.
//! The server publishes them so operators can follow a run's log lines
//! against the intended sequence.

use crate::names::orchestrations;

/// Node IDs map to activity names for matching against log output
pub struct FlowDiagram {
    /// The orchestration name this flow belongs to
    pub orchestration_name: &'static str,
    /// Mermaid flowchart definition
    pub mermaid: &'static str,
    /// Mapping of node IDs to activity name suffixes
    pub node_mappings: &'static [(&'static str, &'static str)],
}

/// Refresh Services orchestration flow (one iteration per unique service)
pub const REFRESH_SERVICES_FLOW: FlowDiagram = FlowDiagram {
    orchestration_name: orchestrations::REFRESH_SERVICES,
    mermaid: r#"flowchart TD
    subgraph batch["Batch"]
        start(["▶ Start"])
        decode["🧾 Decode Detail<br/><small>string or object</small>"]
        next_entity{"Next unique<br/>cluster|service?"}
        malformed["⚠ Report Malformed"]
    end

    subgraph gate["Stability Gate"]
        check["📋 Check Stability<br/><small>1 deployment, COMPLETED, PRIMARY,<br/>running = desired, 0 pending</small>"]
        stable{"Stable?"}
        skipped(["⏭ Skipped"])
    end

    subgraph refresh["Refresh"]
        discover["📋 Discover Bound Alarms<br/><small>any dimension value</small>"]
        disable["📋 Disable Alarm Actions"]
        settle["⏱ Settle"]
        redeploy["📋 Force Redeploy"]
        publish["📋 Publish Verification Request"]
        pacing["⏱ Pace"]
        failed(["💥 Failed<br/><small>alarms stay disabled</small>"])
    end

    done(["🏁 Completed"])

    start --> decode
    decode --> next_entity
    next_entity -->|Malformed| malformed
    malformed --> next_entity
    next_entity -->|Yes| check
    next_entity -->|No more| done
    check --> stable
    stable -->|No / lookup error| skipped
    skipped --> next_entity
    stable -->|Yes| discover
    discover --> disable
    disable --> settle
    settle --> redeploy
    redeploy -->|Error| failed
    redeploy --> publish
    publish --> pacing
    pacing --> next_entity
    failed --> next_entity

    classDef activity fill:#3b82f6,color:#fff,stroke:#1d4ed8
    classDef timer fill:#06b6d4,color:#fff,stroke:#0891b2
    classDef decision fill:#f59e0b,color:#000,stroke:#d97706
    classDef success fill:#22c55e,color:#fff,stroke:#16a34a
    classDef failure fill:#ef4444,color:#fff,stroke:#dc2626
    classDef start fill:#a855f7,color:#fff,stroke:#9333ea

    class start start
    class check,discover,disable,redeploy,publish activity
    class settle,pacing timer
    class next_entity,stable decision
    class done success
    class skipped,failed,malformed failure"#,
    node_mappings: &[
        ("check", "check-stability"),
        ("discover", "discover-bound-alarms"),
        ("disable", "set-alarm-actions"),
        ("redeploy", "force-redeploy"),
        ("publish", "publish-verification"),
    ],
};

/// Verify Refreshed Services orchestration flow
pub const VERIFY_REFRESHED_SERVICES_FLOW: FlowDiagram = FlowDiagram {
    orchestration_name: orchestrations::VERIFY_REFRESHED_SERVICES,
    mermaid: r#"flowchart TD
    start(["▶ Start"])
    validate{"clusterName and<br/>services present?"}
    invalid(["💥 Error result"])
    describe["📋 Describe Service Counts"]
    each{"Next service?"}
    stable{"running = desired?"}
    discover["📋 Discover Bound Alarms<br/><small>ServiceName dimension only</small>"]
    enable["📋 Enable Alarm Actions"]
    report["📝 Report Status"]
    done(["🏁 Completed"])

    start --> validate
    validate -->|No| invalid
    validate -->|Yes| describe
    describe --> each
    each -->|Yes| stable
    each -->|No more| done
    stable -->|Yes| discover
    discover --> enable
    enable --> report
    stable -->|No| report
    report --> each

    classDef activity fill:#3b82f6,color:#fff,stroke:#1d4ed8
    classDef decision fill:#f59e0b,color:#000,stroke:#d97706
    classDef success fill:#22c55e,color:#fff,stroke:#16a34a
    classDef failure fill:#ef4444,color:#fff,stroke:#dc2626
    classDef start fill:#a855f7,color:#fff,stroke:#9333ea

    class start start
    class describe,discover,enable activity
    class validate,each,stable decision
    class done success
    class invalid failure"#,
    node_mappings: &[
        ("describe", "describe-service-counts"),
        ("discover", "discover-bound-alarms"),
        ("enable", "set-alarm-actions"),
    ],
};

/// Immediate Refresh orchestration flow
pub const IMMEDIATE_REFRESH_FLOW: FlowDiagram = FlowDiagram {
    orchestration_name: orchestrations::IMMEDIATE_REFRESH,
    mermaid: r#"flowchart TD
    start(["▶ Start"])
    redeploy["📋 Force Redeploy<br/><small>configured cluster/service</small>"]
    done(["🏁 Acknowledged"])
    failed(["💥 Error"])

    start --> redeploy
    redeploy -->|Ok| done
    redeploy -->|Error| failed

    classDef activity fill:#3b82f6,color:#fff,stroke:#1d4ed8
    classDef success fill:#22c55e,color:#fff,stroke:#16a34a
    classDef failure fill:#ef4444,color:#fff,stroke:#dc2626
    classDef start fill:#a855f7,color:#fff,stroke:#9333ea

    class start start
    class redeploy activity
    class done success
    class failed failure"#,
    node_mappings: &[("redeploy", "force-redeploy")],
};

/// All flow diagrams
pub const ALL_FLOWS: &[&FlowDiagram] = &[
    &REFRESH_SERVICES_FLOW,
    &VERIFY_REFRESHED_SERVICES_FLOW,
    &IMMEDIATE_REFRESH_FLOW,
];

/// Look up a flow by orchestration name
pub fn get_flow(orchestration_name: &str) -> Option<&'static FlowDiagram> {
    ALL_FLOWS
        .iter()
        .copied()
        .find(|flow| flow.orchestration_name == orchestration_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity_names::activities;

    const ACTIVITY_NAMES: &[&str] = &[
        activities::CHECK_STABILITY,
        activities::DESCRIBE_SERVICE_COUNTS,
        activities::DISCOVER_BOUND_ALARMS,
        activities::SET_ALARM_ACTIONS,
        activities::FORCE_REDEPLOY,
        activities::PUBLISH_VERIFICATION,
    ];

    #[test]
    fn test_every_orchestration_has_a_flow() {
        for name in orchestrations::ALL {
            assert!(get_flow(name).is_some(), "missing flow for {}", name);
        }
        assert!(get_flow("unknown").is_none());
    }

    #[test]
    fn test_pause_labels_carry_no_fixed_duration() {
        // Pause lengths come from settings.
        let mermaid = REFRESH_SERVICES_FLOW.mermaid;
        assert!(mermaid.contains("Settle\"]"));
        assert!(mermaid.contains("Pace\"]"));
        assert!(!mermaid.contains("3s"));
        assert!(!mermaid.contains("2s"));
    }

    #[test]
    fn test_node_mappings_reference_real_activities_and_nodes() {
        for flow in ALL_FLOWS {
            for (node, suffix) in flow.node_mappings {
                assert!(
                    ACTIVITY_NAMES.iter().any(|name| name.ends_with(suffix)),
                    "{} maps to unknown activity {}",
                    node,
                    suffix
                );
                assert!(flow.mermaid.contains(node), "{} not in diagram", node);
            }
        }
    }
}
