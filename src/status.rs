//! Status tags and the visual tokens they map to.

use serde::Serialize;

/// Visual token for a node status: fill/stroke/text colours plus a legend label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusToken {
    pub key: &'static str,
    pub label: &'static str,
    pub fill: &'static str,
    pub stroke: &'static str,
    pub text: &'static str,
}

pub const NEUTRAL: StatusToken = StatusToken {
    key: "neutral",
    label: "Not set",
    fill: "#f4f4f5",
    stroke: "#a1a1aa",
    text: "#27272a",
};

const TOKENS: &[StatusToken] = &[
    StatusToken {
        key: "draft",
        label: "Draft",
        fill: "#e0e7ff",
        stroke: "#4338ca",
        text: "#312e81",
    },
    StatusToken {
        key: "in-progress",
        label: "In progress",
        fill: "#fef9c3",
        stroke: "#facc15",
        text: "#713f12",
    },
    StatusToken {
        key: "waiting",
        label: "Waiting",
        fill: "#ffedd5",
        stroke: "#fb923c",
        text: "#7c2d12",
    },
    StatusToken {
        key: "review",
        label: "Review",
        fill: "#e0f2fe",
        stroke: "#0ea5e9",
        text: "#083344",
    },
    StatusToken {
        key: "success",
        label: "Done",
        fill: "#dcfce7",
        stroke: "#16a34a",
        text: "#14532d",
    },
    StatusToken {
        key: "rejected",
        label: "Rejected",
        fill: "#fee2e2",
        stroke: "#ef4444",
        text: "#7f1d1d",
    },
    StatusToken {
        key: "rework",
        label: "Rework",
        fill: "#fef3c7",
        stroke: "#f97316",
        text: "#7c2d12",
    },
    StatusToken {
        key: "system",
        label: "System",
        fill: "#ede9fe",
        stroke: "#8b5cf6",
        text: "#4c1d95",
    },
    StatusToken {
        key: "info",
        label: "Event",
        fill: "#f0f9ff",
        stroke: "#38bdf8",
        text: "#0f172a",
    },
    NEUTRAL,
];

/// Look up a status tag case-insensitively. Surrounding whitespace is ignored.
pub fn lookup(tag: &str) -> Option<StatusToken> {
    let normalized = tag.trim().to_lowercase();
    TOKENS.iter().copied().find(|t| t.key == normalized)
}
