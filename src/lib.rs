pub mod shared {
    pub mod core {
        pub mod clock;
    }
    pub mod infrastructure {
        pub mod json_store;
    }
}

pub mod modules {
    pub mod utilisation {
        pub mod core {
            pub mod allocation;
            pub mod holidays;
            pub mod navigation;
            pub mod planner;
            pub mod requirement;
            pub mod table;
            pub mod window;
        }
        pub mod errors;
        pub mod use_cases {
            pub mod view_utilisation_report {
                pub mod handler;
                pub mod inbound {
                    pub mod graphql;
                    pub mod http;
                }
            }
            pub mod set_week_requirement {
                pub mod command;
                pub mod decide;
                pub mod decision;
                pub mod handler;
                pub mod inbound {
                    pub mod graphql;
                    pub mod http;
                }
            }
        }
        pub mod adapters {
            pub mod outbound {
                pub mod planner_api;
                pub mod planner_in_memory;
                pub mod requirement_store;
                pub mod schedule_cache;
                pub mod teamweek_client;
            }
        }
    }
}

pub mod shell;
