// Domain logic shared by the commands

pub mod branch_name;
pub mod comments;
