//! Test identifier derivation.
//!
//! A fixture case is named after the test that runs it. Call sites hand in a
//! raw token for that name, which may carry the empty invocation marker `()`.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Empty invocation marker removed from raw call-site tokens.
pub const INVOCATION_MARKER: &str = "()";

/// Helper fn name planted by [`current_test!`](crate::current_test).
const TYPE_PATH_HELPER: &str = "::__macro_tester_probe";

/// Segment `std::any::type_name` emits for closure frames.
const CLOSURE_SEGMENT: &str = "{{closure}}";

/// Canonical name of one fixture case.
///
/// Used verbatim as a directory name under the resources directory, so it
/// must not contain path separators. This is a caller precondition and is
/// not checked.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TestIdentifier(String);

impl TestIdentifier {
    /// Wrap a name that is already canonical. Nothing is stripped.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Get the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the identifier, returning the owned name
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for TestIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TestIdentifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl AsRef<Path> for TestIdentifier {
    fn as_ref(&self) -> &Path {
        Path::new(&self.0)
    }
}

/// Derive a test identifier from a raw call-site token.
///
/// Every occurrence of `()` is removed, not only a trailing one:
/// `testFoo()` becomes `testFoo`, and `test()Bar()` becomes `testBar`.
pub fn derive_identifier(raw: &str) -> TestIdentifier {
    TestIdentifier(raw.replace(INVOCATION_MARKER, ""))
}

/// Extract the enclosing function name from a `type_name` path.
///
/// [`current_test!`](crate::current_test) feeds this the type name of a
/// helper fn declared inside the test, e.g.
/// `my_tests::expands_auto_init::__macro_tester_probe`. The helper segment
/// and any closure frames are dropped; the last remaining segment wins.
pub fn function_name_from_type_path(path: &str) -> &str {
    let path = path.strip_suffix(TYPE_PATH_HELPER).unwrap_or(path);
    path.rsplit("::")
        .find(|segment| *segment != CLOSURE_SEGMENT)
        .unwrap_or(path)
}

/// Expands to the name of the enclosing function as a `&'static str`.
///
/// Stands in for compiler-injected call-site names: inside
/// `fn expands_stringify() { .. }` it yields `"expands_stringify"`, also
/// from within closures and async blocks.
#[macro_export]
macro_rules! current_test {
    () => {{
        fn __macro_tester_probe() {}
        fn __macro_tester_type_name<T>(_: T) -> &'static str {
            ::std::any::type_name::<T>()
        }
        $crate::identifier::function_name_from_type_path(__macro_tester_type_name(
            __macro_tester_probe,
        ))
    }};
}
