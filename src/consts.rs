// Names and constants shared by the annotation handlers

/// Lock field injected for instance methods when no lock name is given
pub const INSTANCE_LOCK_NAME: &str = "$lock";
/// Lock field injected for static methods when no lock name is given
pub const STATIC_LOCK_NAME: &str = "$LOCK";

/// Simple name of the annotation handled by `HandleSynchronized`
pub const SYNCHRONIZED_ANNOTATION: &str = "Synchronized";

/// Element type of the generated lock array
pub const JAVA_LANG_OBJECT: &str = "java.lang.Object";

/// `@Synchronized` runs after handlers that insert statements at the start
/// of a method body (null checks), so those end up inside the critical section.
pub const SYNCHRONIZED_PRIORITY: i32 = 1024;

/// Environment variable overriding `synchronized.flagUsage`
pub const FLAG_USAGE_ENV: &str = "TOLC_SYNCHRONIZED_FLAG_USAGE";
