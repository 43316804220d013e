use std::collections::HashSet;

use super::*;

fn assert_bijective<I: Indexer>(w: usize, h: usize, d: usize) {
  let indexer = I::for_size(w, h, d);
  let mut seen = HashSet::new();
  for z in 0..d {
    for y in 0..h {
      for x in 0..w {
        let idx = indexer.to_index(x, y, z);
        assert!(idx < indexer.storage_len(), "index {idx} past storage");
        assert!(seen.insert(idx), "duplicate index for ({x},{y},{z})");
        assert_eq!(indexer.from_index(idx), (x, y, z));
      }
    }
  }
}

#[test]
fn test_linear_bijective() {
  assert_bijective::<LinearIndexer>(5, 3, 7);
}

#[test]
fn test_morton_bijective_non_power_of_two() {
  assert_bijective::<MortonIndexer>(9, 9, 9);
}

#[test]
fn test_linear_layout_x_fastest() {
  let indexer = LinearIndexer::for_size(4, 4, 4);
  assert_eq!(indexer.to_index(1, 0, 0), 1);
  assert_eq!(indexer.to_index(0, 1, 0), 4);
  assert_eq!(indexer.to_index(0, 0, 1), 16);
  assert_eq!(indexer.storage_len(), 64);
}

#[test]
fn test_morton_interleave() {
  assert_eq!(MortonIndexer::encode(1, 0, 0), 0b001);
  assert_eq!(MortonIndexer::encode(0, 1, 0), 0b010);
  assert_eq!(MortonIndexer::encode(0, 0, 1), 0b100);
  assert_eq!(MortonIndexer::encode(3, 3, 3), 0b111_111);
  assert_eq!(MortonIndexer::decode(0b110_101), (1, 2, 3));
}

#[test]
fn test_morton_large_coordinates() {
  let max = (1u32 << 21) - 1;
  let code = MortonIndexer::encode(max, 12345, max - 7);
  assert_eq!(MortonIndexer::decode(code), (max, 12345, max - 7));
}

#[test]
fn test_morton_storage_power_of_two() {
  assert_eq!(MortonIndexer::for_size(8, 8, 8).storage_len(), 512);
}
