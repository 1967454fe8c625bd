use std::ffi::CString;

/// Resolves an IPv6 zone to a scope id.
///
/// Numeric zones are taken as-is; names are looked up with
/// `if_nametoindex`. Unknown interfaces yield `None`.
pub fn zone_scope_id(zone: &str) -> Option<u32> {
    if let Ok(index) = zone.parse::<u32>() {
        return Some(index);
    }

    let name = CString::new(zone).ok()?;
    // SAFETY: `name` is a valid NUL-terminated string that outlives the call.
    let index = unsafe { libc::if_nametoindex(name.as_ptr()) };
    (index != 0).then_some(index)
}
