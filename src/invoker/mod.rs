mod envelope;
mod invoker;
mod registry;

pub use envelope::BusinessFault;
pub use envelope::InvocationError;
pub use envelope::InvocationInput;
pub use envelope::InvocationOutput;
pub use envelope::ViewUpdate;
pub use invoker::ViewStampedInvoker;
pub use registry::PublishedService;
pub use registry::RegistryError;
pub use registry::ServiceHandler;
pub use registry::ServiceRegistry;
