/// Blank construction, without running any user constructor.
///
/// Implemented for every built-in reflected type and generated by
/// [`#[derive(Reflect)]`](crate::derive::Reflect): a derived struct is built
/// from the blank values of its fields, a derived enum is its first variant.
///
/// # Examples
///
/// ```
/// use op_reflect::{construct::Instantiate, derive::Reflect};
///
/// #[derive(Reflect, Debug, PartialEq)]
/// enum Mode { Fast, Slow }
///
/// #[derive(Reflect)]
/// struct Job {
///     id: u64,
///     mode: Mode,
///     steps: Vec<String>,
/// }
///
/// let job = Job::instantiate();
/// assert_eq!(job.id, 0);
/// assert_eq!(job.mode, Mode::Fast);
/// assert!(job.steps.is_empty());
/// ```
pub trait Instantiate: Sized {
    /// Returns the blank instance.
    fn instantiate() -> Self;
}
