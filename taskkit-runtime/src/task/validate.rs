use super::config::CoreAffinity;

pub fn validate_priority(priority: u32, ceiling: u32) -> bool {
    priority < ceiling
}

/// Valid if unpinned or pinned to an existing core.
pub fn validate_core(core: CoreAffinity, core_count: u8) -> bool {
    match core {
        CoreAffinity::NoAffinity => true,
        CoreAffinity::Core(index) => index < core_count,
    }
}
