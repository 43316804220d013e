//! Background voxelization on the rayon pool.
//!
//! ```text
//! caller                           rayon
//! ┌──────────────────┐
//! │ voxelize_async() │──spawn──►  ┌────────────┐
//! └────────┬─────────┘            │ voxelize() │
//!          │ poll() / wait()      └─────┬──────┘
//!          ▼                            │ bounded(1)
//! ┌──────────────────┐                  │
//! │ VoxelizationJob  │◄─────────────────┘
//! └──────────────────┘
//! ```

use crossbeam_channel::{self as channel, Receiver, TryRecvError};
use glam::Vec3;

use super::{voxelize, VoxelizationProperties, VoxelizationReport};
use crate::error::{VoxelError, VoxelResult};
use crate::grid::VoxelGrid;
use crate::indexer::Indexer;
use crate::types::MaterialId;

/// Finished voxelization: the written grid and its report.
#[derive(Debug)]
pub struct VoxelizationOutput<I: Indexer> {
  pub grid: VoxelGrid<I>,
  pub report: VoxelizationReport,
}

/// Handle to a voxelization running in the background.
pub struct VoxelizationJob<I: Indexer> {
  receiver: Option<Receiver<VoxelResult<VoxelizationOutput<I>>>>,
}

impl<I: Indexer> VoxelizationJob<I> {
  /// True until the result has been taken by [`poll`](Self::poll).
  pub fn is_pending(&self) -> bool {
    self.receiver.is_some()
  }

  /// Non-blocking. `Some` exactly once, when the work has finished.
  pub fn poll(&mut self) -> Option<VoxelResult<VoxelizationOutput<I>>> {
    let receiver = self.receiver.as_ref()?;

    match receiver.try_recv() {
      Ok(result) => {
        self.receiver = None;
        Some(result)
      }
      Err(TryRecvError::Empty) => None,
      Err(TryRecvError::Disconnected) => {
        self.receiver = None;
        Some(Err(VoxelError::TaskLost))
      }
    }
  }

  /// Block until the work has finished.
  pub fn wait(mut self) -> VoxelResult<VoxelizationOutput<I>> {
    let receiver = self.receiver.take().ok_or(VoxelError::TaskLost)?;
    receiver.recv().unwrap_or(Err(VoxelError::TaskLost))
  }
}

/// Run [`voxelize`] on the rayon pool. The grid moves into the job and comes
/// back in the output.
pub fn voxelize_async<I: Indexer>(
  vertices: Vec<Vec3>,
  normals: Vec<Vec3>,
  mut grid: VoxelGrid<I>,
  material: MaterialId,
  properties: VoxelizationProperties,
) -> VoxelizationJob<I> {
  let (sender, receiver) = channel::bounded(1);

  rayon::spawn(move || {
    let result = voxelize(&vertices, &normals, &mut grid, material, &properties)
      .map(|report| VoxelizationOutput { grid, report });
    // Receiver dropped means the caller lost interest.
    let _ = sender.send(result);
  });

  VoxelizationJob {
    receiver: Some(receiver),
  }
}
