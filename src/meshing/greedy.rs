//! Maximal-rectangle merging over a single face mask.
//!
//! A face mask is a 2D slice of signed type ids: `+id` for an outward face,
//! `-id` for an inward face, `0` for no face. Merging grows each unvisited
//! nonzero cell first along `u`, then along `v` while every covered cell
//! still matches, and zeroes the covered region so no cell is emitted twice.

/// One merged rectangle of identical mask cells.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct MaskRect {
    /// Rectangle origin along the mask's `u` axis.
    pub u: usize,
    /// Rectangle origin along the mask's `v` axis.
    pub v: usize,
    /// Extent along `u`.
    pub width: usize,
    /// Extent along `v`.
    pub height: usize,
    /// The shared mask value of every covered cell (never zero).
    pub value: i32,
}

/// Merges a face mask into maximal rectangles.
///
/// Consumes the mask in place (covered cells are zeroed) and appends one
/// `MaskRect` per merged rectangle to `rects`, which is cleared first so a
/// caller can reuse the same buffer across slices.
///
/// The merged rectangle count never exceeds the number of nonzero cells, and
/// reaches it only when no two adjacent cells share a value.
pub fn merge_mask(mask: &mut [i32], size_u: usize, size_v: usize, rects: &mut Vec<MaskRect>) {
    debug_assert_eq!(mask.len(), size_u * size_v);
    rects.clear();

    for v in 0..size_v {
        let mut u = 0;
        while u < size_u {
            let value = mask[v * size_u + u];
            if value == 0 {
                u += 1;
                continue;
            }

            let mut width = 1;
            while u + width < size_u && mask[v * size_u + u + width] == value {
                width += 1;
            }

            let mut height = 1;
            'grow: while v + height < size_v {
                for du in 0..width {
                    if mask[(v + height) * size_u + u + du] != value {
                        break 'grow;
                    }
                }
                height += 1;
            }

            for dv in 0..height {
                for du in 0..width {
                    mask[(v + dv) * size_u + u + du] = 0;
                }
            }

            rects.push(MaskRect {
                u,
                v,
                width,
                height,
                value,
            });
            u += width;
        }
    }
}
