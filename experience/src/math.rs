pub type Number = f32;
pub type Vector3 = nalgebra::Vector3<Number>;
pub type Point3 = nalgebra::Point3<Number>;
pub type Isometry3 = nalgebra::Isometry3<Number>;
pub type UnitQuaternion = nalgebra::UnitQuaternion<Number>;
