//! 引擎配置
//! Engine configuration

/// 引擎配置
/// Engine configuration
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// OTLP 端点；为空表示禁用遥测
    /// OTLP endpoint; absent or empty disables telemetry
    pub endpoint: Option<String>,
    /// 导出时使用的请求头，格式为 `k=v,k2=v2`
    /// Headers sent with exports, formatted as `k=v,k2=v2`
    pub headers: String,
    /// 服务名称
    /// Service name
    pub service_name: String,
    /// 根 Span 名称，默认为进程命令行
    /// Root span name; defaults to the process command line
    pub root_span_name: Option<String>,
    /// 导出运行时的工作线程数
    /// Worker threads of the exporter runtime
    pub worker_threads: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            headers: String::new(),
            service_name: "buildtrace".to_string(),
            root_span_name: None,
            worker_threads: 2,
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn with_headers(mut self, headers: impl Into<String>) -> Self {
        self.headers = headers.into();
        self
    }

    pub fn with_service_name(mut self, service_name: impl Into<String>) -> Self {
        self.service_name = service_name.into();
        self
    }

    pub fn with_root_span_name(mut self, name: impl Into<String>) -> Self {
        self.root_span_name = Some(name.into());
        self
    }

    pub fn with_worker_threads(mut self, worker_threads: usize) -> Self {
        self.worker_threads = worker_threads.max(1);
        self
    }

    /// 是否启用了导出
    /// Whether exporting is enabled
    pub fn is_enabled(&self) -> bool {
        self.endpoint.as_deref().is_some_and(|e| !e.trim().is_empty())
    }

    /// 根 Span 名称
    /// Root span name
    pub fn root_span_name(&self) -> String {
        self.root_span_name
            .clone()
            .unwrap_or_else(|| std::env::args().collect::<Vec<_>>().join(" "))
    }
}
