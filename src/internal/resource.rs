//! 远程资源领域模块：资源元数据、分片数据，以及获取元数据的探测函数。

pub mod functions;
pub mod structs;
