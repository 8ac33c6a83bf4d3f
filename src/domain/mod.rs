pub mod flag;
pub mod progress;

pub use flag::{flag_id, FlagCandidate, FlaggedItem};
pub use progress::{
    overall_stats, section_percent, CurriculumProgress, ModuleProgress, OverallStats,
    ProgressUpdate,
};
