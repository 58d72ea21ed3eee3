mod concurrent_plans;
