macro_rules! impl_iterator {
    () => {
        fn next(&mut self) -> Option<Self::Item> {
            self.inner.next()
        }
        fn size_hint(&self) -> (usize, Option<usize>) {
            self.inner.size_hint()
        }
        fn count(self) -> usize {
            self.inner.count()
        }
        fn nth(&mut self, n: usize) -> Option<Self::Item> {
            self.inner.nth(n)
        }
        fn last(self) -> Option<Self::Item> {
            self.inner.last()
        }
    };
}
pub(crate) use impl_iterator;
