//! 模块导入判定规则
//! 白名单：k6 命名空间与相对路径；黑名单：可用于 I/O、进程控制或代码执行的运行时模块

/// k6 保留的模块根名称
pub const K6_MODULE_ROOT: &str = "k6";

/// Node.js 协议前缀，`node:fs` 与 `fs` 视为同一模块
const NODE_SCHEME: &str = "node:";

/// 提供网络传输能力的 k6 模块
pub const PROTOCOL_MODULES: &[&str] = &[
    "k6/http",
    "k6/ws",
    "k6/net/grpc",
    "k6/experimental/websockets",
];

/// 禁止导入的运行时/系统模块
pub const FORBIDDEN_MODULES: &[&str] = &[
    // 进程控制
    "child_process",
    "cluster",
    "process",
    "worker_threads",
    "vm",
    "v8",
    "inspector",
    "repl",
    "module",
    // 文件系统
    "fs",
    "fs/promises",
    "path",
    "os",
    // 网络原语
    "net",
    "http",
    "https",
    "http2",
    "dgram",
    "dns",
    "tls",
    // 加密
    "crypto",
    // 通用工具
    "util",
    "stream",
    "buffer",
    "events",
    "readline",
    "zlib",
    "perf_hooks",
    "async_hooks",
];

/// 是否为黑名单模块（精确匹配，兼容 `node:` 前缀）
pub fn is_forbidden_module(name: &str) -> bool {
    let bare = name.strip_prefix(NODE_SCHEME).unwrap_or(name);
    FORBIDDEN_MODULES.contains(&bare)
}

/// 是否属于 k6 命名空间（`k6` 或 `k6/...`）
pub fn is_k6_module(specifier: &str) -> bool {
    specifier == K6_MODULE_ROOT
        || specifier
            .strip_prefix(K6_MODULE_ROOT)
            .is_some_and(|rest| rest.starts_with('/'))
}

/// 是否为相对路径导入
pub fn is_relative_import(specifier: &str) -> bool {
    specifier.starts_with("./") || specifier.starts_with("../")
}

/// 是否为允许的导入：k6 命名空间或相对路径，其余一律视为未知
pub fn is_allowed_import(specifier: &str) -> bool {
    is_k6_module(specifier) || is_relative_import(specifier)
}

/// 是否为协议模块
pub fn is_protocol_module(specifier: &str) -> bool {
    PROTOCOL_MODULES.contains(&specifier)
}
