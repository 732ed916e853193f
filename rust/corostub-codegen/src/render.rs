use std::ops::{Index, IndexMut};

use corostub_schema::CallShape;

use crate::code_writer::CodeWriter;

/// One value per call shape, iterated in [`CallShape::ALL`] order.
#[derive(Debug, Default, Clone)]
pub(crate) struct ShapeBuckets<T> {
    buckets: [T; 4],
}

impl<T> ShapeBuckets<T> {
    pub(crate) fn iter(&self) -> impl Iterator<Item = (CallShape, &T)> {
        CallShape::ALL.into_iter().zip(self.buckets.iter())
    }
}

impl<T> Index<CallShape> for ShapeBuckets<T> {
    type Output = T;

    fn index(&self, shape: CallShape) -> &T {
        &self.buckets[shape.index()]
    }
}

impl<T> IndexMut<CallShape> for ShapeBuckets<T> {
    fn index_mut(&mut self, shape: CallShape) -> &mut T {
        &mut self.buckets[shape.index()]
    }
}

/// A writer appending to one section buffer, starting at indent level 0.
pub(crate) fn fragment(buf: &mut String, indent_spaces: usize) -> CodeWriter<&mut String> {
    CodeWriter::with_indent_spaces(buf, indent_spaces)
}
