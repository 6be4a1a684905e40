//! Internal compiler error (ICE) reporting
//!
//! A panic anywhere in the compiler means one of its own invariants was
//! broken. The hook installed here tells the user so, along with the version
//! and arguments needed to reproduce it, before the usual panic message.

use std::panic::PanicHookInfo;

/// Print the ICE banner around the default panic output
fn ice_hook(
    default_panic_hook: &(dyn Fn(&PanicHookInfo<'_>) + Send + Sync),
    panic_info: &PanicHookInfo<'_>,
) {
    eprintln!("error: internal compiler error: tigc panicked");
    eprintln!("note: this is a bug in tigc, not in your program.");
    eprintln!();
    for line in super::build_info::version().lines() {
        eprintln!("note: {line}");
    }
    eprintln!(
        "note: command line arguments: {}",
        std::env::args().collect::<Vec<_>>().join(" ")
    );
    eprintln!();
    default_panic_hook(panic_info);
    eprintln!();
    eprintln!("error: aborting due to internal compiler error");
}

/// Install the ICE panic hook
///
/// Backtraces are turned on unless the user already asked for full ones.
pub fn setup_panic_hook() {
    let default_panic_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        ice_hook(&*default_panic_hook, panic_info);
    }));

    if std::env::var("RUST_BACKTRACE").ok().as_deref() != Some("full") {
        std::env::set_var("RUST_BACKTRACE", "1");
    }
}
