//! Test helpers for code that is expected to panic.

/// Asserts that running `$run` panics. The block may borrow test locals mutably, so it is wrapped
/// in [`AssertUnwindSafe`](std::panic::AssertUnwindSafe).
#[allow(unused_macros)]
macro_rules! assert_panics {
    ($run:block) => {
        assert_panics!($run, "assertion failed to panic")
    };
    ($run:block, $msg:literal) => {
        assert!(
            std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| $run)).is_err(),
            $msg
        );
        println!("^ panic caught");
    };
}

#[allow(unused_imports)]
pub(crate) use assert_panics;
