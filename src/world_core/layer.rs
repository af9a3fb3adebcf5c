/// One pure generation stage: equal inputs always produce equal outputs, so
/// regenerating an unloaded region reproduces it exactly.
pub trait Layer<I, O> {
    fn generate(&self, input: I) -> O;
}
