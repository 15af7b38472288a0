//! Vertex buffers
//!
//! A `VertexBuffer` owns one contiguous byte block interpreted through a `VertexLayout`.
//! Attributes are reached through bounds-checked views (`AttributeRef`/`AttributeMut`)
//! instead of raw offsets, so a stale index or a malformed layout yields `None`
//! rather than touching another vertex's bytes.
//!
//! Invariant: `vertex_count * stride == data.len()` whenever the buffer is observable.

use bytemuck::{Pod, Zeroable};

use super::layout::{AttributeSemantic, VertexAttribute, VertexLayout};
use crate::error::BufferError;
use crate::math::{Mat4, Vec3, Vec4};

/// Position + RGBA color, the record most draw calls use
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct ColoredVertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
}

impl ColoredVertex {
    pub const fn new(position: [f32; 3], color: [f32; 4]) -> Self {
        Self { position, color }
    }

    pub fn layout() -> VertexLayout {
        VertexLayout::new(
            &[
                VertexAttribute::f32s(AttributeSemantic::Position, 0, 3),
                VertexAttribute::f32s(AttributeSemantic::Color, 12, 4),
            ],
            std::mem::size_of::<ColoredVertex>() as u32,
        )
    }
}

fn decode_component(bytes: &[u8]) -> Option<f32> {
    match bytes.len() {
        4 => Some(bytemuck::pod_read_unaligned::<f32>(bytes)),
        2 => Some(bytemuck::pod_read_unaligned::<u16>(bytes) as f32 / u16::MAX as f32),
        1 => Some(bytes[0] as f32 / u8::MAX as f32),
        _ => None,
    }
}

fn encode_component(bytes: &mut [u8], value: f32) -> bool {
    match bytes.len() {
        4 => bytes.copy_from_slice(bytemuck::bytes_of(&value)),
        2 => {
            let v = (value.clamp(0.0, 1.0) * u16::MAX as f32).round() as u16;
            bytes.copy_from_slice(bytemuck::bytes_of(&v));
        }
        1 => bytes[0] = (value.clamp(0.0, 1.0) * u8::MAX as f32).round() as u8,
        _ => return false,
    }
    true
}

/// Read-only view of one attribute of one vertex
#[derive(Debug, Clone, Copy)]
pub struct AttributeRef<'a> {
    attr: VertexAttribute,
    bytes: &'a [u8],
}

impl<'a> AttributeRef<'a> {
    pub fn attribute(&self) -> &VertexAttribute {
        &self.attr
    }

    pub fn bytes(&self) -> &'a [u8] {
        self.bytes
    }

    pub fn component(&self, i: usize) -> Option<f32> {
        if i >= self.attr.component_count as usize {
            return None;
        }
        let size = self.attr.component_size as usize;
        self.bytes.get(i * size..(i + 1) * size).and_then(decode_component)
    }

    /// Decoded components, missing ones filled from `(0, 0, 0, 1)`.
    /// `None` if the component size cannot be decoded.
    pub fn to_vec4(&self) -> Option<Vec4> {
        let n = (self.attr.component_count as usize).min(4);
        let mut values = [0.0f32; 4];
        for (i, slot) in values.iter_mut().enumerate().take(n) {
            *slot = self.component(i)?;
        }
        Some(Vec4::from_slice_or_default(&values[..n]))
    }
}

/// Mutable view of one attribute of one vertex
#[derive(Debug)]
pub struct AttributeMut<'a> {
    attr: VertexAttribute,
    bytes: &'a mut [u8],
}

impl<'a> AttributeMut<'a> {
    pub fn attribute(&self) -> &VertexAttribute {
        &self.attr
    }

    pub fn view(&self) -> AttributeRef<'_> {
        AttributeRef { attr: self.attr, bytes: &*self.bytes }
    }

    pub fn set(&mut self, i: usize, value: f32) -> bool {
        if i >= self.attr.component_count as usize {
            return false;
        }
        let size = self.attr.component_size as usize;
        match self.bytes.get_mut(i * size..(i + 1) * size) {
            Some(slot) => encode_component(slot, value),
            None => false,
        }
    }

    /// Writes as many leading components as both sides have; returns how many were written
    pub fn write(&mut self, values: &[f32]) -> usize {
        let mut written = 0;
        for (i, v) in values.iter().enumerate().take(self.attr.component_count as usize) {
            if !self.set(i, *v) {
                break;
            }
            written += 1;
        }
        written
    }
}

fn alloc_zeroed(len: usize) -> Option<Vec<u8>> {
    let mut data = Vec::new();
    if data.try_reserve_exact(len).is_err() {
        log::error!("failed to allocate {} bytes of vertex data", len);
        return None;
    }
    data.resize(len, 0);
    Some(data)
}

/// Vertex data plus the layout describing it
#[derive(Debug, Clone, Default)]
pub struct VertexBuffer {
    data: Vec<u8>,
    vertex_count: usize,
    layout: VertexLayout,
}

impl VertexBuffer {
    /// A buffer with no vertices; every attribute access on it fails
    pub fn empty(layout: VertexLayout) -> Self {
        Self { data: Vec::new(), vertex_count: 0, layout }
    }

    /// `vertex_count` zero-filled vertices
    pub fn zeroed(layout: VertexLayout, vertex_count: usize) -> Self {
        let stride = layout.stride();
        if stride == 0 {
            log::warn!("vertex layout has zero stride, creating empty buffer");
            return Self::empty(layout);
        }
        match vertex_count.checked_mul(stride).and_then(alloc_zeroed) {
            Some(data) => Self { data, vertex_count, layout },
            None => Self::empty(layout),
        }
    }

    /// Copies `vertex_count` vertices out of `data`. Bytes missing from a short slice stay zero.
    pub fn from_bytes(layout: VertexLayout, data: &[u8], vertex_count: usize) -> Self {
        let mut buffer = Self::zeroed(layout, vertex_count);
        let n = buffer.data.len().min(data.len());
        if n < buffer.data.len() {
            log::warn!(
                "vertex data holds {} bytes, {} expected; remainder zero-filled",
                data.len(),
                buffer.data.len()
            );
        }
        buffer.data[..n].copy_from_slice(&data[..n]);
        buffer
    }

    /// Builds from typed records; the vertex count follows from the layout stride
    pub fn from_vertices<T: Pod>(layout: VertexLayout, vertices: &[T]) -> Self {
        let bytes: &[u8] = bytemuck::cast_slice(vertices);
        let stride = layout.stride();
        if stride != std::mem::size_of::<T>() {
            log::warn!(
                "record size {} differs from layout stride {}",
                std::mem::size_of::<T>(),
                stride
            );
        }
        let count = if stride == 0 { 0 } else { bytes.len() / stride };
        Self::from_bytes(layout, bytes, count)
    }

    /// Replaces the whole contents. Grows the block when `data` is larger, zeroes and
    /// releases the tail when smaller, then recomputes the vertex count. An empty slice
    /// leaves the buffer untouched, as with `IndexBuffer::update`.
    ///
    /// Any views obtained before the call are invalidated by the borrow checker.
    pub fn update(&mut self, data: &[u8]) -> Result<(), BufferError> {
        if data.is_empty() {
            return Ok(());
        }
        let stride = self.layout.stride();
        if stride == 0 {
            return Err(BufferError::ZeroStride);
        }
        if data.len() % stride != 0 {
            return Err(BufferError::PartialVertex { len: data.len(), stride });
        }

        let old_len = self.data.len();
        if data.len() > old_len {
            self.data
                .try_reserve_exact(data.len() - old_len)
                .map_err(|_| BufferError::OutOfMemory(data.len()))?;
            log::debug!("vertex buffer grown from {} to {} bytes", old_len, data.len());
            self.data.resize(data.len(), 0);
        } else if data.len() < old_len {
            self.data[data.len()..].fill(0);
            self.data.truncate(data.len());
        }

        self.data.copy_from_slice(data);
        self.vertex_count = data.len() / stride;
        Ok(())
    }

    pub fn update_vertices<T: Pod>(&mut self, vertices: &[T]) -> Result<(), BufferError> {
        self.update(bytemuck::cast_slice(vertices))
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    pub fn is_empty(&self) -> bool {
        self.vertex_count == 0
    }

    /// Allocated bytes
    pub fn size(&self) -> usize {
        self.data.len()
    }

    pub fn stride(&self) -> usize {
        self.layout.stride()
    }

    pub fn layout(&self) -> &VertexLayout {
        &self.layout
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    fn attribute_range(
        &self,
        vertex_index: usize,
        semantic: AttributeSemantic,
    ) -> Option<(VertexAttribute, std::ops::Range<usize>)> {
        if vertex_index >= self.vertex_count {
            return None;
        }
        let attr = *self.layout.find(semantic)?;
        let start = vertex_index * self.layout.stride() + attr.offset as usize;
        let end = start + attr.byte_len();
        (end <= self.data.len()).then_some((attr, start..end))
    }

    /// View of `semantic` within vertex `vertex_index`, or `None` if either is absent
    pub fn attribute(&self, vertex_index: usize, semantic: AttributeSemantic) -> Option<AttributeRef<'_>> {
        let (attr, range) = self.attribute_range(vertex_index, semantic)?;
        Some(AttributeRef { attr, bytes: &self.data[range] })
    }

    pub fn attribute_mut(
        &mut self,
        vertex_index: usize,
        semantic: AttributeSemantic,
    ) -> Option<AttributeMut<'_>> {
        let (attr, range) = self.attribute_range(vertex_index, semantic)?;
        Some(AttributeMut { attr, bytes: &mut self.data[range] })
    }

    pub fn read(&self, vertex_index: usize, semantic: AttributeSemantic) -> Option<Vec4> {
        self.attribute(vertex_index, semantic)?.to_vec4()
    }

    pub fn write(&mut self, vertex_index: usize, semantic: AttributeSemantic, values: &[f32]) -> bool {
        match self.attribute_mut(vertex_index, semantic) {
            Some(mut view) => view.write(values) > 0,
            None => false,
        }
    }

    /// Multiplies every position by `m` (with perspective divide) in place.
    /// Returns how many vertices were transformed.
    pub fn transform_positions(&mut self, m: &Mat4) -> usize {
        let mut transformed = 0;
        for i in 0..self.vertex_count {
            let Some(p) = self.read(i, AttributeSemantic::Position) else {
                continue;
            };
            let out = m.transform_point(Vec3::new(p.x, p.y, p.z));
            if self.write(i, AttributeSemantic::Position, &[out.x, out.y, out.z, 1.0]) {
                transformed += 1;
            }
        }
        transformed
    }

    /// Copy of this buffer with positions transformed by `m`
    pub fn transformed(&self, m: &Mat4) -> VertexBuffer {
        let mut out = self.clone();
        out.transform_positions(m);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use AttributeSemantic::*;
    use crate::buffer::IndexBuffer;

    fn triangle() -> [ColoredVertex; 3] {
        [
            ColoredVertex::new([-0.5, -0.5, 0.0], [1.0, 0.0, 0.0, 1.0]),
            ColoredVertex::new([0.5, -0.5, 0.0], [0.0, 1.0, 0.0, 1.0]),
            ColoredVertex::new([0.0, 0.5, 0.0], [0.0, 0.0, 1.0, 1.0]),
        ]
    }

    #[test]
    fn test_create_from_records() {
        let vb = VertexBuffer::from_vertices(ColoredVertex::layout(), &triangle());
        assert_eq!(vb.vertex_count(), 3);
        assert_eq!(vb.stride(), 28);
        assert_eq!(vb.size(), vb.vertex_count() * vb.stride());
        assert_eq!(vb.read(2, Position), Some(Vec4::new(0.0, 0.5, 0.0, 1.0)));
        assert_eq!(vb.read(1, Color), Some(Vec4::new(0.0, 1.0, 0.0, 1.0)));
    }

    #[test]
    fn test_zeroed_buffer() {
        let vb = VertexBuffer::zeroed(ColoredVertex::layout(), 4);
        assert_eq!(vb.size(), 4 * 28);
        assert!(vb.as_bytes().iter().all(|b| *b == 0));
        assert_eq!(vb.read(3, Position), Some(Vec4::new(0.0, 0.0, 0.0, 1.0)));
    }

    #[test]
    fn test_out_of_range_and_missing_semantic() {
        let vb = VertexBuffer::from_vertices(ColoredVertex::layout(), &triangle());
        assert!(vb.attribute(3, Position).is_none());
        assert!(vb.attribute(0, Normal).is_none());
        assert!(vb.attribute(0, TexCoord).is_none());
    }

    #[test]
    fn test_empty_buffer_rejects_access() {
        let vb = VertexBuffer::empty(ColoredVertex::layout());
        assert_eq!(vb.vertex_count(), 0);
        assert!(vb.attribute(0, Position).is_none());

        let zero_stride = VertexBuffer::zeroed(VertexLayout::new(&[], 0), 10);
        assert_eq!(zero_stride.vertex_count(), 0);
        assert_eq!(zero_stride.size(), 0);
    }

    #[test]
    fn test_update_grows_and_shrinks() {
        let mut vb = VertexBuffer::from_vertices(ColoredVertex::layout(), &triangle());

        let mut six = triangle().to_vec();
        six.extend_from_slice(&triangle());
        vb.update_vertices(&six).unwrap();
        assert_eq!(vb.vertex_count(), 6);
        assert_eq!(vb.size(), 6 * 28);

        vb.update_vertices(&triangle()[..1]).unwrap();
        assert_eq!(vb.vertex_count(), 1);
        assert_eq!(vb.size(), 28);
        assert!(vb.attribute(1, Position).is_none());

    }

    #[test]
    fn test_empty_update_is_a_no_op() {
        let mut vb = VertexBuffer::from_vertices(ColoredVertex::layout(), &triangle());
        let mut ib = IndexBuffer::new(&[0, 1, 2]);
        vb.update(&[]).unwrap();
        ib.update(&[]).unwrap();
        assert_eq!(vb.vertex_count(), 3);
        assert_eq!(vb.size(), 3 * 28);
        assert_eq!(ib.len(), 3);
        assert_eq!(vb.read(2, Position), Some(Vec4::new(0.0, 0.5, 0.0, 1.0)));
    }

    #[test]
    fn test_update_rejects_bad_sizes() {
        let mut vb = VertexBuffer::from_vertices(ColoredVertex::layout(), &triangle());
        assert_eq!(
            vb.update(&[0u8; 30]),
            Err(BufferError::PartialVertex { len: 30, stride: 28 })
        );
        assert_eq!(vb.vertex_count(), 3);

        let mut broken = VertexBuffer::empty(VertexLayout::new(&[], 0));
        assert_eq!(broken.update(&[0u8; 8]), Err(BufferError::ZeroStride));
    }

    #[test]
    fn test_short_source_is_zero_filled() {
        let bytes = bytemuck::cast_slice::<ColoredVertex, u8>(&triangle()).to_vec();
        let vb = VertexBuffer::from_bytes(ColoredVertex::layout(), &bytes[..28], 2);
        assert_eq!(vb.vertex_count(), 2);
        assert_eq!(vb.read(1, Position), Some(Vec4::new(0.0, 0.0, 0.0, 1.0)));
    }

    #[test]
    fn test_read_compute_write_cycle() {
        let mut vb = VertexBuffer::from_vertices(ColoredVertex::layout(), &triangle());
        {
            let mut pos = vb.attribute_mut(0, Position).unwrap();
            assert_eq!(pos.write(&[1.0, 2.0, 3.0, 4.0]), 3);
            assert!(!pos.set(3, 9.0));
        }
        assert_eq!(vb.read(0, Position), Some(Vec4::new(1.0, 2.0, 3.0, 1.0)));
        assert_eq!(vb.read(0, Color), Some(Vec4::new(1.0, 0.0, 0.0, 1.0)));
    }

    #[test]
    fn test_normalized_integer_components() {
        let layout = VertexLayout::new(
            &[
                VertexAttribute::f32s(Position, 0, 2),
                VertexAttribute::new(Color, 8, 1, 4),
                VertexAttribute::new(TexCoord, 12, 2, 2),
            ],
            16,
        );
        let mut vb = VertexBuffer::zeroed(layout, 1);
        assert!(vb.write(0, Color, &[1.0, 0.5, 0.0, 1.0]));
        assert!(vb.write(0, TexCoord, &[0.25, 1.0]));
        let c = vb.read(0, Color).unwrap();
        assert_eq!(c.x, 1.0);
        assert!((c.y - 128.0 / 255.0).abs() < 1e-6);
        let uv = vb.read(0, TexCoord).unwrap();
        assert!((uv.x - 0.25).abs() < 1e-4);
        assert_eq!(uv.y, 1.0);
    }

    #[test]
    fn test_attribute_past_end_of_buffer() {
        let layout = VertexLayout::new(&[VertexAttribute::f32s(Color, 8, 4)], 12);
        let vb = VertexBuffer::zeroed(layout, 1);
        assert!(vb.attribute(0, Color).is_none());
    }

    #[test]
    fn test_transform_positions_in_place_and_copy() {
        let mut vb = VertexBuffer::from_vertices(ColoredVertex::layout(), &triangle());
        let m = Mat4::from_translation(Vec3::new(1.0, 0.0, 0.0));

        let copy = vb.transformed(&m);
        assert_eq!(copy.read(0, Position), Some(Vec4::new(0.5, -0.5, 0.0, 1.0)));
        assert_eq!(vb.read(0, Position), Some(Vec4::new(-0.5, -0.5, 0.0, 1.0)));

        assert_eq!(vb.transform_positions(&m), 3);
        assert_eq!(vb.read(2, Position), Some(Vec4::new(1.0, 0.5, 0.0, 1.0)));
        assert_eq!(vb.read(2, Color), Some(Vec4::new(0.0, 0.0, 1.0, 1.0)));
    }
}
