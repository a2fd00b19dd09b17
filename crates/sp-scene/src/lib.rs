pub mod furniture;
pub mod part;
pub mod products;
pub mod session;
pub mod synth;
pub mod transform;

pub use furniture::synthesize_furniture;
pub use part::{Part, PartNode, PartTree, Shape, Surface};
pub use products::{ProductStyle, Slot};
pub use session::{ObjectDescription, SceneDescription, SceneObject, SceneSession};
pub use synth::{SynthContext, SynthFn, SynthRegistry, window_opening};
pub use transform::{CameraPose, ObjectTransform, plan_to_world, plan_yaw};
