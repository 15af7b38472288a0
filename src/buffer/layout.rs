//! Vertex attribute layout
//!
//! A layout is the table that tells the rasterizer where each attribute lives inside
//! one vertex record. Offsets are caller-supplied and not checked for overlap.

use serde::{Serialize, Deserialize};

/// Logical meaning of one field within a vertex record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttributeSemantic {
    Position,
    Color,
    Normal,
    TexCoord,
}

impl AttributeSemantic {
    pub const ALL: [AttributeSemantic; 4] = [
        AttributeSemantic::Position,
        AttributeSemantic::Color,
        AttributeSemantic::Normal,
        AttributeSemantic::TexCoord,
    ];

    fn slot(self) -> usize {
        match self {
            AttributeSemantic::Position => 0,
            AttributeSemantic::Color => 1,
            AttributeSemantic::Normal => 2,
            AttributeSemantic::TexCoord => 3,
        }
    }
}

/// One attribute inside a vertex record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VertexAttribute {
    pub semantic: AttributeSemantic,
    /// Byte offset from the start of the vertex
    pub offset: u32,
    /// Size in bytes of one component (4 = f32, 2 = unorm16, 1 = unorm8)
    pub component_size: u32,
    pub component_count: u32,
}

impl VertexAttribute {
    pub const fn new(
        semantic: AttributeSemantic,
        offset: u32,
        component_size: u32,
        component_count: u32,
    ) -> Self {
        Self { semantic, offset, component_size, component_count }
    }

    /// `count` f32 components at `offset`
    pub const fn f32s(semantic: AttributeSemantic, offset: u32, count: u32) -> Self {
        Self::new(semantic, offset, 4, count)
    }

    /// Total bytes occupied by this attribute
    pub fn byte_len(&self) -> usize {
        self.component_size as usize * self.component_count as usize
    }
}

/// Attribute table plus the stride of one vertex
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VertexLayout {
    attributes: Vec<VertexAttribute>,
    stride: u32,
    // first descriptor index per semantic, resolved once at construction
    lookup: [Option<usize>; 4],
}

impl VertexLayout {
    /// Copies the attribute table. If the copy cannot be allocated the layout comes back
    /// with no attributes, so every later attribute lookup fails.
    pub fn new(attributes: &[VertexAttribute], stride: u32) -> Self {
        let mut table = Vec::new();
        if table.try_reserve_exact(attributes.len()).is_err() {
            log::error!("failed to allocate {} vertex attributes", attributes.len());
            return Self { attributes: Vec::new(), stride, lookup: [None; 4] };
        }
        table.extend_from_slice(attributes);

        let mut lookup = [None; 4];
        for (i, attr) in table.iter().enumerate() {
            let slot = &mut lookup[attr.semantic.slot()];
            if slot.is_none() {
                *slot = Some(i);
            }
        }

        Self { attributes: table, stride, lookup }
    }

    pub fn stride(&self) -> usize {
        self.stride as usize
    }

    pub fn attributes(&self) -> &[VertexAttribute] {
        &self.attributes
    }

    pub fn attribute_count(&self) -> usize {
        self.attributes.len()
    }

    pub fn find(&self, semantic: AttributeSemantic) -> Option<&VertexAttribute> {
        self.lookup[semantic.slot()].and_then(|i| self.attributes.get(i))
    }

    pub fn has(&self, semantic: AttributeSemantic) -> bool {
        self.find(semantic).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use AttributeSemantic::*;

    #[test]
    fn test_lookup_by_semantic() {
        let layout = VertexLayout::new(
            &[VertexAttribute::f32s(Position, 0, 3), VertexAttribute::f32s(Color, 12, 4)],
            28,
        );
        assert_eq!(layout.stride(), 28);
        assert_eq!(layout.attribute_count(), 2);
        assert_eq!(layout.find(Color).map(|a| a.offset), Some(12));
        assert_eq!(layout.find(Position).map(|a| a.byte_len()), Some(12));
        assert!(layout.find(Normal).is_none());
        assert!(!layout.has(TexCoord));
    }

    #[test]
    fn test_first_duplicate_wins() {
        let layout = VertexLayout::new(
            &[VertexAttribute::f32s(Color, 0, 4), VertexAttribute::f32s(Color, 16, 4)],
            32,
        );
        assert_eq!(layout.find(Color).map(|a| a.offset), Some(0));
    }

    #[test]
    fn test_empty_layout() {
        let layout = VertexLayout::new(&[], 0);
        assert_eq!(layout.attribute_count(), 0);
        for s in AttributeSemantic::ALL {
            assert!(layout.find(s).is_none());
        }
    }
}
