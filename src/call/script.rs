//! Canned content for the simulated preceptor call

use super::state::Participant;

pub const PRECEPTOR_NAME: &str = "Sarah";

/// Lines played back during a live call, one per transcript tick
pub const TRANSCRIPT_SCRIPT: &[(Participant, &str)] = &[
    (
        Participant::Counterpart,
        "Hello! I understand you have a question about IV medication compatibility?",
    ),
    (
        Participant::Local,
        "Yes, I wanted to confirm if Vancomycin and Zosyn can be run in the same line?",
    ),
    (
        Participant::Counterpart,
        "That's a great question. No, Vancomycin and Zosyn should never be run in the same line due to the risk of precipitation.",
    ),
    (
        Participant::Local,
        "What would you recommend for administration then?",
    ),
    (
        Participant::Counterpart,
        "You'll need to use separate IV lines, or if using the same line, ensure thorough flushing between medications. Always follow your facility's protocol for line flushing.",
    ),
];

pub const KEY_POINTS: &[&str] = &[
    "IV medication compatibility between Vancomycin and Zosyn",
    "Proper administration protocol for incompatible medications",
    "Facility-specific line flushing procedures",
];

pub const RECOMMENDATIONS: &[&str] = &[
    "Use separate IV lines for Vancomycin and Zosyn",
    "Follow proper line flushing protocols between medications",
    "Consult facility guidelines for specific procedures",
];

/// Looped, muted clips for the preceptor's tile
pub const COUNTERPART_CLIPS: &[&str] = &[
    "https://cdn.coverr.co/videos/coverr-a-female-doctor-talking-to-the-camera-5244/1080p.mp4",
    "https://cdn.coverr.co/videos/coverr-doctor-talking-to-the-camera-5243/1080p.mp4",
    "https://cdn.coverr.co/videos/coverr-female-doctor-talking-to-the-camera-5242/1080p.mp4",
    "https://cdn.coverr.co/videos/coverr-female-doctor-talking-to-the-camera-2-5241/1080p.mp4",
];

/// Looped, muted clips for the user's own tile
pub const SELF_CLIPS: &[&str] = &[
    "https://cdn.coverr.co/videos/coverr-young-woman-talking-during-video-call-1584/1080p.mp4",
    "https://cdn.coverr.co/videos/coverr-person-using-laptop-4584/1080p.mp4",
    "https://cdn.coverr.co/videos/coverr-woman-having-a-video-call-3634/1080p.mp4",
];
